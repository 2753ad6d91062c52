//! Survey CSV Loader
//! Loads the survey file with Polars and validates the declared schema once,
//! so column drift surfaces here instead of as a silent no-op downstream.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("survey file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("survey file is missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("survey file contains no data rows")]
    Empty,
}

/// Load the survey CSV into a DataFrame, preserving row order and column
/// names. Malformed individual values become nulls rather than failing the
/// whole load; missing columns or an empty table are fatal.
pub fn load_survey(path: &Path) -> Result<DataFrame, DataLoadError> {
    if !path.is_file() {
        return Err(DataLoadError::FileNotFound(path.to_path_buf()));
    }

    // Lazy scan with a generous schema-inference window, then collect.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    validate_schema(&df)?;

    if df.height() == 0 {
        return Err(DataLoadError::Empty);
    }

    log::info!(
        "loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Check that every column the pipeline reads is present.
fn validate_schema(df: &DataFrame) -> Result<(), DataLoadError> {
    let present: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    let missing: Vec<String> = schema::required_columns()
        .iter()
        .filter(|c| !present.contains(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns(missing))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// A two-row CSV carrying every required column.
    pub(crate) fn sample_csv() -> String {
        let mut header = vec![
            "Age",
            "Primary streaming service",
            "Hours per day",
            "While working",
            "Instrumentalist",
            "Composer",
            "Fav genre",
            "Foreign languages",
            "BPM",
        ];
        header.extend(schema::FREQUENCY_COLS);
        header.extend(["Anxiety", "Depression", "Insomnia", "OCD", "Music effects"]);

        let freq = vec!["Never"; schema::FREQUENCY_COLS.len()].join(",");
        let row1 = format!("23,Spotify,3.5,Yes,No,No,Rock,Yes,120,{freq},5,4,3,1,Improve");
        let row2 = format!("31,Apple Music,1.0,No,No,No,Pop,No,98,{freq},2,1,0,0,No effect");
        format!("{}\n{row1}\n{row2}\n", header.join(","))
    }

    pub(crate) fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_a_valid_survey_file() {
        let file = write_csv(&sample_csv());
        let df = load_survey(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert!(df.column("BPM").is_ok());
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let err = load_survey(Path::new("/no/such/survey.csv")).unwrap_err();
        match err {
            DataLoadError::FileNotFound(p) => {
                assert_eq!(p, PathBuf::from("/no/such/survey.csv"))
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_columns_are_named() {
        let file = write_csv("Age,BPM\n23,120\n");
        let err = load_survey(file.path()).unwrap_err();
        match err {
            DataLoadError::MissingColumns(cols) => {
                assert!(cols.contains(&"Composer".to_string()));
                assert!(cols.contains(&"Frequency [Rock]".to_string()));
                assert!(!cols.contains(&"Age".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let header = sample_csv().lines().next().unwrap().to_string();
        let file = write_csv(&format!("{header}\n"));
        let err = load_survey(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty));
    }
}
