//! mxmh-explorer - Music & Mental Health survey explorer
//!
//! Loads the survey CSV, runs the cleaning pipeline once, then serves an
//! interactive menu of chart reports over the cleaned table.

mod charts;
mod data;
mod menu;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mxmh-explorer", version, about = "Music & Mental Health survey explorer")]
struct Args {
    /// Path to the survey CSV file
    #[arg(default_value = "mxmh_survey_results.csv")]
    input: PathBuf,

    /// Directory where chart images are written
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = data::load_survey(&args.input)
        .with_context(|| format!("could not load survey data from {}", args.input.display()))?;
    let cleaned = data::clean(&raw).context("could not clean survey data")?;
    log::info!(
        "cleaned table: {} of {} rows retained",
        cleaned.height(),
        raw.height()
    );

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("could not create output directory {}", args.out_dir.display()))?;

    menu::run_loop(&cleaned, &args.out_dir)
}
