//! Command-line argument parsing for the `germination` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Calculate how many seeds to sow for a desired number of seedlings.
#[derive(Parser, Debug)]
#[command(name = "germination")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Germination rate of the seeds (60% = 0.6)
    #[arg(short = 'p', long = "rate", default_value_t = 0.6, allow_negative_numbers = true)]
    pub rate: f64,

    /// Number of seedlings you want
    #[arg(short = 'k', long = "seedlings", default_value_t = 10)]
    pub seedlings: u32,

    /// Minimum chance of getting that many seedlings (95% = 0.95)
    #[arg(short = 'c', long = "confidence", default_value_t = 0.95, allow_negative_numbers = true)]
    pub confidence: f64,

    /// Configuration file (defaults to `germination-config.yaml` if present)
    #[arg(long = "config", env = "GERMINATION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer queries from a file instead, one `rate seedlings confidence`
    /// per line (`-` reads stdin)
    #[arg(short = 'f', long = "queries")]
    pub queries: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Accept any mathematically valid input, ignoring configured limits
    #[arg(long = "no-limits")]
    pub no_limits: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable sentence (default)
    #[default]
    Text,
    /// One JSON object per result
    Json,
}
