//! Survey Cleaner
//! The deterministic six-step cleaning contract. Step order matters: the BPM
//! median is computed after the essential-field filter but before the range
//! filters, so re-orderings change the imputed value.

use polars::prelude::*;
use thiserror::Error;

use super::schema;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("data cleaning failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("BPM is missing in some rows but no surviving row has a BPM value to take a median from")]
    BpmMedianUnavailable,
}

/// Clean the raw survey table. Pure and idempotent: running the cleaner on
/// its own output yields an identical table.
///
/// Steps, in order:
/// 1. drop rows missing any essential field
/// 2. fill missing BPM with the median over the step-1 table
/// 3. drop rows with Age outside [10,100] or Hours per day outside [0,24]
/// 4. lowercase + trim the designated categorical fields
/// 5. recode frequency labels to numeric levels 0-3
/// 6. derive the Age Group column
///
/// Malformed individual values never abort the pipeline: an unrecognized
/// categorical or frequency label passes through unchanged (counted and
/// logged, not raised).
pub fn clean(raw: &DataFrame) -> Result<DataFrame, CleanError> {
    // 1. Essential-field completeness filter.
    let essential: Vec<Expr> = schema::ESSENTIAL_COLS.iter().map(|c| col(*c)).collect();
    let df = raw.clone().lazy().drop_nulls(Some(essential)).collect()?;

    // 2. BPM imputation over the table as it stands after step 1.
    let bpm = df.column(schema::COL_BPM)?;
    let needs_fill = bpm.null_count() > 0;
    let bpm_median = bpm.as_materialized_series().median();

    let mut lf = df.lazy();
    match (needs_fill, bpm_median) {
        (true, Some(median)) => {
            log::info!("imputing missing BPM values with median {median}");
            lf = lf.with_column(col(schema::COL_BPM).fill_null(lit(median)));
        }
        (true, None) => return Err(CleanError::BpmMedianUnavailable),
        (false, _) => {}
    }

    // 3. Range filters.
    lf = lf
        .filter(
            col(schema::COL_AGE)
                .gt_eq(lit(schema::AGE_MIN))
                .and(col(schema::COL_AGE).lt_eq(lit(schema::AGE_MAX))),
        )
        .filter(
            col(schema::COL_HOURS)
                .gt_eq(lit(schema::HOURS_MIN))
                .and(col(schema::COL_HOURS).lt_eq(lit(schema::HOURS_MAX))),
        );

    // 4. Categorical normalization.
    let normalized: Vec<Expr> = schema::CATEGORICAL_COLS
        .iter()
        .map(|c| {
            col(*c)
                .str()
                .to_lowercase()
                .str()
                .strip_chars(lit(NULL))
                .alias(*c)
        })
        .collect();
    lf = lf.with_columns(normalized);

    // 5. Frequency recoding.
    let recoded: Vec<Expr> = schema::FREQUENCY_COLS
        .iter()
        .map(|c| frequency_expr(c))
        .collect();
    lf = lf.with_columns(recoded);

    // 6. Age Group derivation.
    lf = lf.with_column(age_group_expr());

    let cleaned = lf.collect()?;
    warn_unrecognized_frequency(&cleaned);
    Ok(cleaned)
}

/// Map the four ordinal labels to their numeric levels; anything else
/// (including an already-recoded level) passes through unchanged.
fn frequency_expr(name: &str) -> Expr {
    let c = || col(name);
    let [(l0, v0), (l1, v1), (l2, v2), (l3, v3)] = schema::FREQUENCY_LEVELS;
    when(c().eq(lit(l0)))
        .then(lit(v0))
        .when(c().eq(lit(l1)))
        .then(lit(v1))
        .when(c().eq(lit(l2)))
        .then(lit(v2))
        .when(c().eq(lit(l3)))
        .then(lit(v3))
        .otherwise(c())
        .alias(name)
}

/// Bin Age into the fixed age-group labels. Intervals are left-open, so an
/// age equal to a bin edge lands in the lower bin. Ages reaching this point
/// are already within [10,100], so the last label is the fallthrough.
fn age_group_expr() -> Expr {
    let age = || col(schema::COL_AGE);
    let edges = schema::AGE_BIN_EDGES;
    let labels = schema::AGE_GROUP_LABELS;
    when(age().lt_eq(lit(edges[0])))
        .then(lit(labels[0]))
        .when(age().lt_eq(lit(edges[1])))
        .then(lit(labels[1]))
        .when(age().lt_eq(lit(edges[2])))
        .then(lit(labels[2]))
        .when(age().lt_eq(lit(edges[3])))
        .then(lit(labels[3]))
        .when(age().lt_eq(lit(edges[4])))
        .then(lit(labels[4]))
        .otherwise(lit(labels[5]))
        .alias(schema::COL_AGE_GROUP)
}

/// Count frequency values that matched neither a known label nor a recoded
/// level. Surfaced as a warning so data-quality drift is visible without
/// aborting the run.
fn warn_unrecognized_frequency(df: &DataFrame) {
    let known: Vec<&str> = schema::FREQUENCY_LEVELS
        .iter()
        .flat_map(|(label, level)| [*label, *level])
        .collect();

    let mut unrecognized = 0usize;
    for name in schema::FREQUENCY_COLS {
        let Ok(column) = df.column(name) else { continue };
        let Ok(values) = column.as_materialized_series().str() else {
            continue;
        };
        unrecognized += values
            .into_iter()
            .flatten()
            .filter(|v| !known.contains(v))
            .count();
    }

    if unrecognized > 0 {
        log::warn!("{unrecognized} frequency values did not match a known label and were left unchanged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::*;

    /// A raw frame of `n` well-formed rows; tests overwrite the columns they
    /// care about.
    fn raw_frame(n: usize) -> DataFrame {
        let mut columns = vec![
            Column::new(COL_AGE.into(), vec![25.0; n]),
            Column::new(COL_HOURS.into(), vec![2.0; n]),
            Column::new(COL_BPM.into(), vec![Some(100.0); n]),
            Column::new(COL_STREAMING.into(), vec![Some("Spotify"); n]),
            Column::new(COL_WHILE_WORKING.into(), vec![Some("Yes"); n]),
            Column::new(COL_INSTRUMENTALIST.into(), vec![Some("No"); n]),
            Column::new(COL_COMPOSER.into(), vec![Some("No"); n]),
            Column::new(COL_FAV_GENRE.into(), vec![Some("Rock"); n]),
            Column::new(COL_FOREIGN_LANGUAGES.into(), vec![Some("Yes"); n]),
            Column::new(COL_MUSIC_EFFECTS.into(), vec![Some("Improve"); n]),
        ];
        for name in MENTAL_HEALTH_COLS {
            columns.push(Column::new(name.into(), vec![5.0; n]));
        }
        for name in FREQUENCY_COLS {
            columns.push(Column::new(name.into(), vec![Some("Never"); n]));
        }
        DataFrame::new(columns).unwrap()
    }

    fn replace(df: &mut DataFrame, name: &str, column: Column) {
        df.replace(name, column.as_materialized_series().clone())
            .unwrap();
    }

    fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn drops_rows_missing_essential_fields() {
        let mut df = raw_frame(3);
        replace(
            &mut df,
            COL_COMPOSER,
            Column::new(COL_COMPOSER.into(), vec![Some("No"), None, Some("Yes")]),
        );
        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn range_filters_apply_to_age_and_hours() {
        let mut df = raw_frame(6);
        replace(
            &mut df,
            COL_AGE,
            Column::new(COL_AGE.into(), vec![9.0, 10.0, 100.0, 101.0, 50.0, 50.0]),
        );
        replace(
            &mut df,
            COL_HOURS,
            Column::new(COL_HOURS.into(), vec![1.0, 0.0, 24.0, 1.0, -0.5, 24.5]),
        );
        let cleaned = clean(&df).unwrap();
        let ages = f64_values(&cleaned, COL_AGE);
        assert_eq!(ages, vec![Some(10.0), Some(100.0)]);
    }

    /// The five-row scenario: one row dropped for a missing essential field,
    /// one for Age out of range, and the missing BPM filled with the median
    /// of the values that survived step 1 (not the raw-table median).
    #[test]
    fn bpm_median_is_computed_after_essential_filter_only() {
        let mut df = raw_frame(5);
        replace(
            &mut df,
            COL_COMPOSER,
            Column::new(
                COL_COMPOSER.into(),
                vec![Some("No"), None, Some("No"), Some("No"), Some("No")],
            ),
        );
        // Row 2's extreme BPM must not influence the median: it is gone
        // before the median is taken. Row 4's BPM (age-filtered later) must.
        replace(
            &mut df,
            COL_BPM,
            Column::new(
                COL_BPM.into(),
                vec![Some(100.0), Some(900.0), None, Some(140.0), Some(120.0)],
            ),
        );
        replace(
            &mut df,
            COL_AGE,
            Column::new(COL_AGE.into(), vec![25.0, 25.0, 25.0, 105.0, 25.0]),
        );

        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.height(), 3);
        let bpm = f64_values(&cleaned, COL_BPM);
        // median of {100, 140, 120} = 120
        assert_eq!(bpm, vec![Some(100.0), Some(120.0), Some(120.0)]);
    }

    #[test]
    fn bpm_has_no_missing_entries_after_cleaning() {
        let mut df = raw_frame(4);
        replace(
            &mut df,
            COL_BPM,
            Column::new(
                COL_BPM.into(),
                vec![None, Some(90.0), None, Some(110.0)],
            ),
        );
        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.column(COL_BPM).unwrap().null_count(), 0);
    }

    #[test]
    fn all_null_bpm_is_an_error() {
        let mut df = raw_frame(2);
        replace(
            &mut df,
            COL_BPM,
            Column::new(COL_BPM.into(), vec![None::<f64>, None]),
        );
        let err = clean(&df).unwrap_err();
        assert!(matches!(err, CleanError::BpmMedianUnavailable));
    }

    #[test]
    fn table_emptied_by_essential_filter_is_not_an_error() {
        let mut df = raw_frame(2);
        replace(
            &mut df,
            COL_COMPOSER,
            Column::new(COL_COMPOSER.into(), vec![None::<&str>, None]),
        );
        let cleaned = clean(&df).unwrap();
        assert_eq!(cleaned.height(), 0);
    }

    #[test]
    fn categorical_fields_are_lowercased_and_trimmed() {
        let mut df = raw_frame(2);
        replace(
            &mut df,
            COL_STREAMING,
            Column::new(
                COL_STREAMING.into(),
                vec![Some("  Spotify "), Some("APPLE Music")],
            ),
        );
        replace(
            &mut df,
            COL_FAV_GENRE,
            Column::new(COL_FAV_GENRE.into(), vec![Some("Rock\t"), Some(" K pop")]),
        );
        let cleaned = clean(&df).unwrap();
        assert_eq!(
            str_values(&cleaned, COL_STREAMING),
            vec![Some("spotify".into()), Some("apple music".into())]
        );
        assert_eq!(
            str_values(&cleaned, COL_FAV_GENRE),
            vec![Some("rock".into()), Some("k pop".into())]
        );
    }

    #[test]
    fn frequency_labels_recode_and_unknown_labels_pass_through() {
        let mut df = raw_frame(6);
        let col_name = FREQUENCY_COLS[0];
        replace(
            &mut df,
            col_name,
            Column::new(
                col_name.into(),
                vec![
                    Some("Never"),
                    Some("Rarely"),
                    Some("Sometimes"),
                    Some("Very frequently"),
                    Some("Dunno"),
                    None,
                ],
            ),
        );
        let cleaned = clean(&df).unwrap();
        assert_eq!(
            str_values(&cleaned, col_name),
            vec![
                Some("0".into()),
                Some("1".into()),
                Some("2".into()),
                Some("3".into()),
                Some("Dunno".into()),
                None,
            ]
        );
    }

    #[test]
    fn age_group_respects_left_open_bin_edges() {
        let ages = [18.0, 19.0, 25.0, 26.0, 35.0, 36.0, 50.0, 51.0, 65.0, 66.0, 100.0];
        let expected = [
            "Teens",
            "Young Adults",
            "Young Adults",
            "Adults",
            "Adults",
            "Mid-Age",
            "Mid-Age",
            "Seniors",
            "Seniors",
            "Elderly",
            "Elderly",
        ];
        let mut df = raw_frame(ages.len());
        replace(&mut df, COL_AGE, Column::new(COL_AGE.into(), ages.to_vec()));
        let cleaned = clean(&df).unwrap();
        let groups = str_values(&cleaned, COL_AGE_GROUP);
        let expected: Vec<Option<String>> =
            expected.iter().map(|s| Some(s.to_string())).collect();
        assert_eq!(groups, expected);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mut df = raw_frame(4);
        replace(
            &mut df,
            COL_BPM,
            Column::new(
                COL_BPM.into(),
                vec![Some(100.0), None, Some(140.0), Some(120.0)],
            ),
        );
        replace(
            &mut df,
            COL_STREAMING,
            Column::new(
                COL_STREAMING.into(),
                vec![Some(" Spotify"), Some("YouTube Music"), Some("spotify"), None],
            ),
        );
        let once = clean(&df).unwrap();
        let twice = clean(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }
}
