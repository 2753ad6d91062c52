//! Data module - survey loading, schema, and cleaning

mod cleaner;
mod loader;
pub mod schema;

pub use cleaner::{clean, CleanError};
pub use loader::{load_survey, DataLoadError};
