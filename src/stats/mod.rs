//! Stats module - descriptive aggregations

pub mod calculator;
