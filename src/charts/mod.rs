//! Charts module - chart rendering and survey reports

pub mod renderer;
pub mod reports;
