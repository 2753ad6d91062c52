//! Survey Reports
//! One function per menu entry. Each takes the cleaned table read-only,
//! aggregates, renders a deterministically-named PNG into the output
//! directory (overwriting any previous artifact), and returns the path.
//! Two reports additionally print a console summary.

use anyhow::Result;
use polars::prelude::*;
use std::path::{Path, PathBuf};

use crate::charts::renderer::{self, BarGroup};
use crate::data::schema;
use crate::stats::calculator;

/// Age-group labels that actually occur in the table, in fixed bin order.
fn present_age_groups(df: &DataFrame) -> PolarsResult<Vec<String>> {
    let counts = calculator::value_counts(df, schema::COL_AGE_GROUP)?;
    Ok(schema::AGE_GROUP_LABELS
        .iter()
        .filter(|label| counts.iter().any(|(l, _)| l == *label))
        .map(|label| label.to_string())
        .collect())
}

fn genre_counts(df: &DataFrame) -> PolarsResult<Vec<(String, u32)>> {
    calculator::value_counts(df, schema::COL_FAV_GENRE)
}

/// Display name of a frequency column: `Frequency [K pop]` -> `K pop`.
fn frequency_genre_name(column: &str) -> String {
    column
        .trim_start_matches("Frequency [")
        .trim_end_matches(']')
        .to_string()
}

fn artifact(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(name)
}

pub fn age_distribution(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "age_distribution.png");
    let ages = calculator::numeric_values(df, schema::COL_AGE)?;
    renderer::histogram(&path, "Age Distribution of Respondents", "Age", &ages, 20)?;
    Ok(path)
}

pub fn streaming_service_usage(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "streaming_service_usage.png");
    let counts = calculator::value_counts(df, schema::COL_STREAMING)?;
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
    renderer::bar_chart(
        &path,
        "Primary Streaming Service Used by Respondents",
        "Streaming Service",
        "Count",
        &labels,
        &values,
    )?;
    Ok(path)
}

pub fn hours_per_day(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "hours_per_day.png");
    let hours = calculator::numeric_values(df, schema::COL_HOURS)?;
    renderer::histogram(
        &path,
        "Distribution of Hours Spent Listening to Music Daily",
        "Hours per Day",
        &hours,
        10,
    )?;
    Ok(path)
}

pub fn favorite_genre(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "favorite_genre.png");
    let counts = genre_counts(df)?;
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
    renderer::horizontal_bar_chart(
        &path,
        "Favorite Music Genres",
        "Count",
        "Genre",
        &labels,
        &values,
    )?;
    Ok(path)
}

pub fn correlation_heatmap(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "correlation_heatmap.png");
    let matrix = calculator::pearson_matrix(df, &schema::MENTAL_HEALTH_COLS)?;
    let labels: Vec<String> = schema::MENTAL_HEALTH_COLS
        .iter()
        .map(|s| s.to_string())
        .collect();
    renderer::heatmap(
        &path,
        "Correlation Between Mental Health Factors",
        &labels,
        &matrix,
    )?;
    Ok(path)
}

pub fn mental_health_distribution(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "mental_health_distribution.png");
    let panels: Vec<(String, Vec<f64>)> = schema::MENTAL_HEALTH_COLS
        .iter()
        .map(|name| Ok((name.to_string(), calculator::numeric_values(df, name)?)))
        .collect::<PolarsResult<_>>()?;
    renderer::histogram_grid(&path, "Distribution of Mental Health Scores", &panels, 10)?;
    Ok(path)
}

pub fn genre_bpm(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "genre_bpm.png");
    let mut groups = calculator::values_by_group(df, schema::COL_FAV_GENRE, schema::COL_BPM)?;
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    renderer::boxplot(
        &path,
        "Genre vs BPM",
        "Favorite Genre",
        "BPM",
        &groups,
        Some((50.0, 210.0)),
    )?;
    Ok(path)
}

pub fn genre_hours_per_day(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "genre_hours_per_day.png");
    let mut groups = calculator::values_by_group(df, schema::COL_FAV_GENRE, schema::COL_HOURS)?;
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    renderer::boxplot(
        &path,
        "Favorite Genre vs Hours Spent Listening per Day",
        "Favorite Genre",
        "Hours per Day",
        &groups,
        None,
    )?;
    Ok(path)
}

pub fn music_effects(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "music_effects.png");
    let counts = calculator::value_counts(df, schema::COL_MUSIC_EFFECTS)?;
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
    renderer::bar_chart(
        &path,
        "Effect of Music on Mental Health",
        "Music Effects",
        "Count",
        &labels,
        &values,
    )?;
    Ok(path)
}

pub fn genre_vs_mental_health(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "genre_vs_mental_health.png");
    let mut genres: Vec<String> = genre_counts(df)?.into_iter().map(|(l, _)| l).collect();
    genres.sort();

    let means = calculator::mean_matrix(
        df,
        schema::COL_FAV_GENRE,
        &genres,
        &schema::MENTAL_HEALTH_COLS,
    )?;
    let panels: Vec<(String, Vec<(String, f64)>)> = schema::MENTAL_HEALTH_COLS
        .iter()
        .enumerate()
        .map(|(ci, name)| {
            let points = genres
                .iter()
                .enumerate()
                .map(|(gi, genre)| (genre.clone(), means[gi][ci]))
                .collect();
            (format!("{name} vs Favorite Genre"), points)
        })
        .collect();
    renderer::line_grid(&path, "Mental Health by Favorite Genre", "Average Score", &panels)?;
    Ok(path)
}

pub fn streaming_service_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "streaming_service_by_age_group.png");
    let age_groups = present_age_groups(df)?;
    let services: Vec<String> = calculator::value_counts(df, schema::COL_STREAMING)?
        .into_iter()
        .map(|(l, _)| l)
        .collect();
    let matrix = calculator::count_matrix(
        df,
        schema::COL_AGE_GROUP,
        &age_groups,
        schema::COL_STREAMING,
        &services,
    )?;
    let series: Vec<BarGroup> = services
        .iter()
        .enumerate()
        .map(|(si, name)| BarGroup {
            name: name.clone(),
            values: matrix.iter().map(|row| row[si] as f64).collect(),
        })
        .collect();
    renderer::grouped_bar_chart(
        &path,
        "Primary Streaming Service Preference by Age Group",
        "Age Group",
        "Count",
        &age_groups,
        &series,
    )?;
    Ok(path)
}

pub fn music_effects_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "music_effects_by_age_group.png");
    let age_groups = present_age_groups(df)?;
    let effects: Vec<String> = calculator::value_counts(df, schema::COL_MUSIC_EFFECTS)?
        .into_iter()
        .map(|(l, _)| l)
        .collect();
    let matrix = calculator::count_matrix(
        df,
        schema::COL_AGE_GROUP,
        &age_groups,
        schema::COL_MUSIC_EFFECTS,
        &effects,
    )?;
    let series: Vec<BarGroup> = effects
        .iter()
        .enumerate()
        .map(|(si, name)| BarGroup {
            name: name.clone(),
            values: matrix.iter().map(|row| row[si] as f64).collect(),
        })
        .collect();
    renderer::grouped_bar_chart(
        &path,
        "Effect of Music on Mental Health by Age Group",
        "Age Group",
        "Count",
        &age_groups,
        &series,
    )?;
    Ok(path)
}

/// Genres on the x axis (ordered by overall count), one bar series per age
/// group.
fn genre_by_age_group_chart(
    df: &DataFrame,
    path: PathBuf,
    title: &str,
    top_n: Option<usize>,
) -> Result<PathBuf> {
    let mut counts = genre_counts(df)?;
    if let Some(n) = top_n {
        counts.truncate(n);
    }
    let genres: Vec<String> = counts.into_iter().map(|(l, _)| l).collect();
    let age_groups = present_age_groups(df)?;
    let matrix = calculator::count_matrix(
        df,
        schema::COL_FAV_GENRE,
        &genres,
        schema::COL_AGE_GROUP,
        &age_groups,
    )?;
    let series: Vec<BarGroup> = age_groups
        .iter()
        .enumerate()
        .map(|(si, name)| BarGroup {
            name: name.clone(),
            values: matrix.iter().map(|row| row[si] as f64).collect(),
        })
        .collect();
    renderer::grouped_bar_chart(&path, title, "Genre", "Count", &genres, &series)?;
    Ok(path)
}

pub fn genre_preference_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    genre_by_age_group_chart(
        df,
        artifact(out_dir, "genre_preference_by_age_group.png"),
        "Favorite Music Genre by Age Group",
        None,
    )
}

pub fn average_mental_health_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "average_mental_health_by_age_group.png");
    let age_groups = present_age_groups(df)?;
    let means = calculator::mean_matrix(
        df,
        schema::COL_AGE_GROUP,
        &age_groups,
        &schema::MENTAL_HEALTH_COLS,
    )?;
    let series: Vec<BarGroup> = schema::MENTAL_HEALTH_COLS
        .iter()
        .enumerate()
        .map(|(ci, name)| BarGroup {
            name: name.to_string(),
            values: means.iter().map(|row| row[ci]).collect(),
        })
        .collect();
    renderer::grouped_bar_chart(
        &path,
        "Average Mental Health Scores by Age Group",
        "Age Group",
        "Average Score",
        &age_groups,
        &series,
    )?;
    Ok(path)
}

pub fn listening_hours_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "listening_hours_by_age_group.png");
    let age_groups = present_age_groups(df)?;
    let by_group = calculator::values_by_group(df, schema::COL_AGE_GROUP, schema::COL_HOURS)?;
    // Re-order first-seen groups into the fixed bin order.
    let groups: Vec<(String, Vec<f64>)> = age_groups
        .iter()
        .filter_map(|label| {
            by_group
                .iter()
                .find(|(l, _)| l == label)
                .map(|(l, v)| (l.clone(), v.clone()))
        })
        .collect();
    renderer::boxplot(
        &path,
        "Daily Music Listening Hours by Age Group",
        "Age Group",
        "Hours per Day",
        &groups,
        None,
    )?;
    Ok(path)
}

pub fn most_popular_genres(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "most_popular_genres.png");
    let mut counts = genre_counts(df)?;
    counts.truncate(10);
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
    renderer::horizontal_bar_chart(
        &path,
        "Top 10 Most Popular Music Genres",
        "Number of Respondents",
        "Genre",
        &labels,
        &values,
    )?;

    println!("Top 10 Most Popular Genres:");
    for (label, count) in &counts {
        println!("  {label:<20} {count}");
    }
    Ok(path)
}

pub fn genre_mental_health_insights(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "genre_mental_health_insights.png");
    let mut counts = genre_counts(df)?;
    counts.truncate(5);

    let panels: Vec<(String, Vec<(String, Vec<f64>)>)> = counts
        .iter()
        .map(|(genre, _)| {
            let sub = df
                .clone()
                .lazy()
                .filter(col(schema::COL_FAV_GENRE).eq(lit(genre.as_str())))
                .collect()?;
            let groups: Vec<(String, Vec<f64>)> = schema::MENTAL_HEALTH_COLS
                .iter()
                .map(|name| Ok((name.to_string(), calculator::numeric_values(&sub, name)?)))
                .collect::<PolarsResult<_>>()?;
            Ok((format!("Mental Health Scores for {genre}"), groups))
        })
        .collect::<PolarsResult<_>>()?;

    renderer::boxplot_grid(
        &path,
        "Mental Health Scores by Popular Genre",
        "Score",
        &panels,
        (0.0, 10.0),
    )?;
    Ok(path)
}

pub fn genre_listening_frequency(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact(out_dir, "genre_listening_frequency.png");
    let mut means = calculator::column_means(df, &schema::FREQUENCY_COLS)?;
    means.retain(|(_, m)| m.is_finite());
    // Stable sort: ties keep the declared column order.
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    means.truncate(10);

    let labels: Vec<String> = means
        .iter()
        .map(|(name, _)| frequency_genre_name(name))
        .collect();
    let values: Vec<f64> = means.iter().map(|(_, m)| *m).collect();
    renderer::horizontal_bar_chart(
        &path,
        "Listening Frequency of Popular Genres",
        "Average Listening Frequency",
        "Genre",
        &labels,
        &values,
    )?;

    println!("Listening Frequency for Popular Genres:");
    for (label, value) in labels.iter().zip(&values) {
        println!("  {label:<20} {value:.3}");
    }
    Ok(path)
}

pub fn genre_popularity_by_age_group(df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
    genre_by_age_group_chart(
        df,
        artifact(out_dir, "genre_popularity_by_age_group.png"),
        "Top 10 Favorite Genres by Age Group",
        Some(10),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_column_names_strip_to_genre() {
        assert_eq!(frequency_genre_name("Frequency [K pop]"), "K pop");
        assert_eq!(
            frequency_genre_name("Frequency [Video game music]"),
            "Video game music"
        );
    }

    #[test]
    fn present_age_groups_follow_bin_order_not_count_order() {
        let df = DataFrame::new(vec![Column::new(
            schema::COL_AGE_GROUP.into(),
            vec!["Seniors", "Teens", "Seniors", "Seniors", "Adults"],
        )])
        .unwrap();
        let groups = present_age_groups(&df).unwrap();
        assert_eq!(groups, vec!["Teens", "Adults", "Seniors"]);
    }
}
