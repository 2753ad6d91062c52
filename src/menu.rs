//! Interactive Menu
//! A closed set of commands dispatched from numbered stdin input. The loop
//! owns no state beyond the cleaned table reference: every selection runs to
//! completion, failures print a diagnostic, and the loop reprompts.

use anyhow::Result;
use polars::prelude::DataFrame;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::charts::reports;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AgeDistribution,
    StreamingServiceUsage,
    HoursPerDay,
    FavoriteGenre,
    CorrelationHeatmap,
    MentalHealthDistribution,
    GenreBpm,
    GenreHoursPerDay,
    MusicEffects,
    GenreVsMentalHealth,
    StreamingServiceByAgeGroup,
    MusicEffectsByAgeGroup,
    GenrePreferenceByAgeGroup,
    AverageMentalHealthByAgeGroup,
    ListeningHoursByAgeGroup,
    MostPopularGenres,
    GenreMentalHealthInsights,
    GenreListeningFrequency,
    GenrePopularityByAgeGroup,
    Exit,
}

/// Selection number `i` maps to `MENU[i - 1]`.
pub const MENU: &[(Command, &str)] = &[
    (Command::AgeDistribution, "Age Distribution"),
    (Command::StreamingServiceUsage, "Primary Streaming Service Usage"),
    (Command::HoursPerDay, "Hours of Music per Day"),
    (Command::FavoriteGenre, "Favorite Music Genre"),
    (
        Command::CorrelationHeatmap,
        "Correlation Heatmap of Mental Health Factors",
    ),
    (
        Command::MentalHealthDistribution,
        "Distribution of Mental Health Scores",
    ),
    (Command::GenreBpm, "Genre vs BPM"),
    (Command::GenreHoursPerDay, "Genre vs Hours per Day"),
    (Command::MusicEffects, "Impact of Music on Mental Health"),
    (Command::GenreVsMentalHealth, "Genre vs Mental Health"),
    (
        Command::StreamingServiceByAgeGroup,
        "Streaming Service Preference by Age Group",
    ),
    (
        Command::MusicEffectsByAgeGroup,
        "Music Effects on Mental Health Across Age Groups",
    ),
    (
        Command::GenrePreferenceByAgeGroup,
        "Music Genre Preference by Age Group",
    ),
    (
        Command::AverageMentalHealthByAgeGroup,
        "Average Mental Health Scores by Age Group",
    ),
    (
        Command::ListeningHoursByAgeGroup,
        "Daily Music Listening Hours by Age Group",
    ),
    (Command::MostPopularGenres, "Most Popular Music Genres"),
    (
        Command::GenreMentalHealthInsights,
        "Mental Health Insights by Popular Genre",
    ),
    (Command::GenreListeningFrequency, "Genre Listening Frequency"),
    (
        Command::GenrePopularityByAgeGroup,
        "Genre Popularity by Age Group",
    ),
    (Command::Exit, "Exit"),
];

impl Command {
    /// Parse a menu selection. Anything that is not a number within the menu
    /// range is `None`.
    pub fn from_selection(input: &str) -> Option<Command> {
        let n: usize = input.trim().parse().ok()?;
        MENU.get(n.checked_sub(1)?).map(|(command, _)| *command)
    }

    /// Run the report behind this command. `Exit` is handled by the loop and
    /// produces nothing here.
    pub fn run(self, df: &DataFrame, out_dir: &Path) -> Result<Option<std::path::PathBuf>> {
        let path = match self {
            Command::AgeDistribution => reports::age_distribution(df, out_dir)?,
            Command::StreamingServiceUsage => reports::streaming_service_usage(df, out_dir)?,
            Command::HoursPerDay => reports::hours_per_day(df, out_dir)?,
            Command::FavoriteGenre => reports::favorite_genre(df, out_dir)?,
            Command::CorrelationHeatmap => reports::correlation_heatmap(df, out_dir)?,
            Command::MentalHealthDistribution => {
                reports::mental_health_distribution(df, out_dir)?
            }
            Command::GenreBpm => reports::genre_bpm(df, out_dir)?,
            Command::GenreHoursPerDay => reports::genre_hours_per_day(df, out_dir)?,
            Command::MusicEffects => reports::music_effects(df, out_dir)?,
            Command::GenreVsMentalHealth => reports::genre_vs_mental_health(df, out_dir)?,
            Command::StreamingServiceByAgeGroup => {
                reports::streaming_service_by_age_group(df, out_dir)?
            }
            Command::MusicEffectsByAgeGroup => reports::music_effects_by_age_group(df, out_dir)?,
            Command::GenrePreferenceByAgeGroup => {
                reports::genre_preference_by_age_group(df, out_dir)?
            }
            Command::AverageMentalHealthByAgeGroup => {
                reports::average_mental_health_by_age_group(df, out_dir)?
            }
            Command::ListeningHoursByAgeGroup => {
                reports::listening_hours_by_age_group(df, out_dir)?
            }
            Command::MostPopularGenres => reports::most_popular_genres(df, out_dir)?,
            Command::GenreMentalHealthInsights => {
                reports::genre_mental_health_insights(df, out_dir)?
            }
            Command::GenreListeningFrequency => reports::genre_listening_frequency(df, out_dir)?,
            Command::GenrePopularityByAgeGroup => {
                reports::genre_popularity_by_age_group(df, out_dir)?
            }
            Command::Exit => return Ok(None),
        };
        Ok(Some(path))
    }
}

fn print_menu() {
    println!("\nChoose an option for analysis:");
    for (i, (_, label)) in MENU.iter().enumerate() {
        println!("{:2}. {label}", i + 1);
    }
}

/// Prompt/dispatch loop. Returns on the Exit selection or on stdin EOF.
pub fn run_loop(df: &DataFrame, out_dir: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        print!("Enter your choice (1-{}): ", MENU.len());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // EOF: behave like an explicit exit so piped input terminates.
            println!();
            return Ok(());
        };
        let line = line?;

        match Command::from_selection(&line) {
            Some(Command::Exit) => {
                println!("Exiting program. Goodbye!");
                return Ok(());
            }
            Some(command) => match command.run(df, out_dir) {
                Ok(Some(path)) => println!("Saved {}", path.display()),
                Ok(None) => {}
                Err(e) => {
                    log::error!("report failed: {e:#}");
                    println!("Could not produce that report: {e:#}");
                }
            },
            None => {
                println!(
                    "Invalid choice. Please enter a number from 1 to {}.",
                    MENU.len()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_map_to_commands_in_menu_order() {
        assert_eq!(
            Command::from_selection("1"),
            Some(Command::AgeDistribution)
        );
        assert_eq!(Command::from_selection(" 7 "), Some(Command::GenreBpm));
        assert_eq!(
            Command::from_selection("20"),
            Some(Command::Exit)
        );
    }

    #[test]
    fn invalid_selections_are_rejected() {
        assert_eq!(Command::from_selection("0"), None);
        assert_eq!(Command::from_selection("21"), None);
        assert_eq!(Command::from_selection("-3"), None);
        assert_eq!(Command::from_selection("two"), None);
        assert_eq!(Command::from_selection(""), None);
    }

    #[test]
    fn exit_is_the_last_menu_entry_and_runs_nothing() {
        assert_eq!(MENU.last().map(|(c, _)| *c), Some(Command::Exit));
        let df = DataFrame::empty();
        let out = std::env::temp_dir();
        assert!(Command::Exit.run(&df, &out).unwrap().is_none());
    }
}
