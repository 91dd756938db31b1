use clap::Parser;

use crate::normalize::{DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to input CSV containing date strings
    pub csv: String,

    /// Path to output CSV with parsed dates
    #[arg(short, long, default_value = "normalized_dates.csv")]
    pub output: String,

    /// Write every date string that failed to normalize to this file
    #[arg(short, long)]
    pub error_log: Option<String>,

    /// Column holding the date strings in the input CSV
    #[arg(short, long, default_value = "Dates")]
    pub column: String,

    /// Earliest plausible year; dates before it are rejected
    #[arg(long, default_value_t = DEFAULT_MIN_YEAR)]
    pub min_year: i32,

    /// Latest plausible year; dates after it are rejected
    #[arg(long, default_value_t = DEFAULT_MAX_YEAR)]
    pub max_year: i32,
}
