//! Declared Survey Schema
//! Every column the program touches is named here once; the loader validates
//! this set at load time instead of matching column names downstream.

/// Respondent age in years.
pub const COL_AGE: &str = "Age";
/// Daily listening time in hours.
pub const COL_HOURS: &str = "Hours per day";
/// Beats-per-minute of the respondent's favorite genre.
pub const COL_BPM: &str = "BPM";
pub const COL_STREAMING: &str = "Primary streaming service";
pub const COL_FAV_GENRE: &str = "Fav genre";
pub const COL_MUSIC_EFFECTS: &str = "Music effects";
pub const COL_FOREIGN_LANGUAGES: &str = "Foreign languages";
pub const COL_WHILE_WORKING: &str = "While working";
pub const COL_INSTRUMENTALIST: &str = "Instrumentalist";
pub const COL_COMPOSER: &str = "Composer";
/// Derived column added by the cleaner.
pub const COL_AGE_GROUP: &str = "Age Group";

/// Columns whose completeness is required for a row to be retained.
pub const ESSENTIAL_COLS: [&str; 7] = [
    COL_AGE,
    COL_STREAMING,
    COL_WHILE_WORKING,
    COL_INSTRUMENTALIST,
    COL_COMPOSER,
    COL_FOREIGN_LANGUAGES,
    COL_MUSIC_EFFECTS,
];

/// Categorical columns normalized to lowercase + trimmed by the cleaner.
pub const CATEGORICAL_COLS: [&str; 4] = [
    COL_STREAMING,
    COL_FAV_GENRE,
    COL_MUSIC_EFFECTS,
    COL_FOREIGN_LANGUAGES,
];

/// Mental-health score columns, each on a 0-10 scale.
pub const MENTAL_HEALTH_COLS: [&str; 4] = ["Anxiety", "Depression", "Insomnia", "OCD"];

/// Per-genre listening frequency columns. Declared explicitly rather than
/// discovered by prefix so that schema drift fails at load time.
pub const FREQUENCY_COLS: [&str; 16] = [
    "Frequency [Classical]",
    "Frequency [Country]",
    "Frequency [EDM]",
    "Frequency [Folk]",
    "Frequency [Gospel]",
    "Frequency [Hip hop]",
    "Frequency [Jazz]",
    "Frequency [K pop]",
    "Frequency [Latin]",
    "Frequency [Lofi]",
    "Frequency [Metal]",
    "Frequency [Pop]",
    "Frequency [R&B]",
    "Frequency [Rap]",
    "Frequency [Rock]",
    "Frequency [Video game music]",
];

/// Ordinal frequency labels and their numeric levels.
pub const FREQUENCY_LEVELS: [(&str, &str); 4] = [
    ("Never", "0"),
    ("Rarely", "1"),
    ("Sometimes", "2"),
    ("Very frequently", "3"),
];

/// Upper edges of the age bins. Intervals are left-open: an age equal to an
/// edge falls into the lower bin, so 18 is still `Teens`.
pub const AGE_BIN_EDGES: [f64; 6] = [18.0, 25.0, 35.0, 50.0, 65.0, 100.0];

/// Labels matching [`AGE_BIN_EDGES`], in ascending age order.
pub const AGE_GROUP_LABELS: [&str; 6] = [
    "Teens",
    "Young Adults",
    "Adults",
    "Mid-Age",
    "Seniors",
    "Elderly",
];

pub const AGE_MIN: f64 = 10.0;
pub const AGE_MAX: f64 = 100.0;
pub const HOURS_MIN: f64 = 0.0;
pub const HOURS_MAX: f64 = 24.0;

/// Every column the pipeline reads. Extra columns in the file (Timestamp,
/// Exploratory, Permissions) are tolerated but never required.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![COL_AGE, COL_HOURS, COL_BPM, COL_FAV_GENRE];
    cols.extend(ESSENTIAL_COLS);
    cols.extend(MENTAL_HEALTH_COLS);
    cols.extend(FREQUENCY_COLS);
    cols.sort_unstable();
    cols.dedup();
    cols
}
