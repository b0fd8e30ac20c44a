//! Command-line front end for the germination seed planner.
//!
//! Answers one question: how many seeds should be sown so that, with a
//! given germination rate, there is at least a given chance of ending up
//! with the desired number of seedlings.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration (`--config`, `GERMINATION_CONFIG`, or
//!    `germination-config.yaml` in the working directory; defaults otherwise)
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Answer the single query, or every line of `--queries` through an
//!    [`EstimateCache`]
//!
//! Results go to stdout; diagnostics go to stderr. The exit code is 0 on
//! success, 2 for rejected input, 3 when a search exceeds its budget, and
//! 1 for anything else.

mod cli;
mod error;
mod queries;

use std::io::Read as _;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use germination_core::config::{LogFormat, LoggingConfig};
use germination_core::{EstimateCache, InputLimits, PlannerConfig, Report, SeedEstimator};
use germination_types::{ConfidenceThreshold, DesiredCount, GerminationRate};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;
use crate::queries::parse_queries;

/// Configuration file picked up from the working directory.
const DEFAULT_CONFIG_FILE: &str = "germination-config.yaml";

/// Application entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(&config.logging);
    info!(
        batch_size = config.estimator.batch_size,
        max_iterations = config.estimator.max_iterations,
        time_budget_ms = config.estimator.time_budget_ms,
        "germination planner starting"
    );

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load configuration from the explicit path, or the default file if it
/// exists, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<PlannerConfig, CliError> {
    if let Some(path) = path {
        return Ok(PlannerConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return Ok(PlannerConfig::from_file(default_path)?);
    }
    Ok(PlannerConfig::parse("")?)
}

/// Initialize structured logging on stderr. `RUST_LOG` takes precedence
/// over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn run(cli: &Cli, config: &PlannerConfig) -> Result<(), CliError> {
    let estimator = SeedEstimator::new(config.estimator)?;
    let limits = (!cli.no_limits).then_some(&config.input_limits);

    match cli.queries.as_deref() {
        None => {
            let report = plan(&estimator, None, limits, cli.rate, cli.seedlings, cli.confidence)?;
            emit(&report, cli.output_format)
        }
        Some(path) => run_batch(&estimator, config, limits, path, cli.output_format),
    }
}

/// Answer every query in the file at `path`, memoizing repeats.
///
/// A failing query is reported on stderr and the rest still run.
fn run_batch(
    estimator: &SeedEstimator,
    config: &PlannerConfig,
    limits: Option<&InputLimits>,
    path: &Path,
    format: OutputFormat,
) -> Result<(), CliError> {
    let input = read_input(path)?;
    let queries = parse_queries(&input)?;
    let mut cache = EstimateCache::from_config(&config.cache)?;

    let mut failed = 0_usize;
    let mut first_exit_code = None;

    for query in &queries {
        let outcome = plan(
            estimator,
            Some(&mut cache),
            limits,
            query.rate,
            query.seedlings,
            query.confidence,
        )
        .and_then(|report| emit(&report, format));

        if let Err(e) = outcome {
            warn!(line = query.line, error = %e, "query failed");
            eprintln!("line {}: {e}", query.line);
            failed = failed.saturating_add(1);
            first_exit_code.get_or_insert_with(|| e.exit_code());
        }
    }

    let stats = cache.stats();
    info!(
        queries = queries.len(),
        failed,
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "batch complete"
    );

    match first_exit_code {
        None => Ok(()),
        Some(exit_code) => Err(CliError::BatchFailed {
            failed,
            total: queries.len(),
            exit_code,
        }),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Validate one query, apply the input limits, and estimate.
fn plan(
    estimator: &SeedEstimator,
    cache: Option<&mut EstimateCache>,
    limits: Option<&InputLimits>,
    rate: f64,
    seedlings: u32,
    confidence: f64,
) -> Result<Report, CliError> {
    let rate = GerminationRate::new(rate)?;
    let seedlings = DesiredCount::new(seedlings)?;
    let confidence = ConfidenceThreshold::new(confidence)?;

    if let Some(limits) = limits {
        limits.check(rate, seedlings, confidence)?;
    }

    let result = cache.map_or_else(
        || estimator.estimate_validated(rate, seedlings, confidence),
        |cache| cache.get_or_estimate(estimator, rate, seedlings, confidence),
    )?;
    debug!(seeds = result.seeds_to_sow, "query answered");

    Ok(Report::new(rate, seedlings, confidence, result))
}

fn emit(report: &Report, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroUsize;

    use germination_core::EstimatorConfig;

    use super::*;
    use crate::error::{EXIT_INVALID_INPUT, EXIT_TIMEOUT};

    #[test]
    fn plan_reference_query() {
        let report = plan(
            &SeedEstimator::default(),
            None,
            Some(&InputLimits::default()),
            0.6,
            10,
            0.95,
        )
        .unwrap();
        assert_eq!(report.result.seeds_to_sow, 23);
        assert_eq!(
            report.summary,
            "To have a 96.51% chance of getting 10 seedlings, plant 23 seeds."
        );
    }

    #[test]
    fn limits_are_optional() {
        let estimator = SeedEstimator::default();
        let limits = InputLimits::default();

        let limited = plan(&estimator, None, Some(&limits), 0.05, 2, 0.95).unwrap_err();
        assert_eq!(limited.exit_code(), EXIT_INVALID_INPUT);

        assert!(plan(&estimator, None, None, 0.05, 2, 0.95).is_ok());
    }

    #[test]
    fn domain_errors_are_invalid_input() {
        let estimator = SeedEstimator::default();
        for (p, k, c) in [(0.6, 0, 0.95), (0.6, 10, 1.0), (0.0, 10, 0.95)] {
            let err = plan(&estimator, None, None, p, k, c).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_INVALID_INPUT, "p={p} k={k} c={c}");
        }
    }

    #[test]
    fn timeouts_map_to_timeout_code() {
        let estimator = SeedEstimator::new(EstimatorConfig {
            max_iterations: 1,
            ..EstimatorConfig::default()
        })
        .unwrap();
        let err = plan(&estimator, None, None, 0.1, 1, 0.99).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TIMEOUT);
    }

    #[test]
    fn batch_reports_first_failure_code() {
        let path = std::env::temp_dir().join(format!(
            "germination-batch-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "0.6 10 0.95\n0.6 0 0.95\n0.1 1 0.99\n").unwrap();

        let config = PlannerConfig {
            estimator: EstimatorConfig {
                max_iterations: 10,
                ..EstimatorConfig::default()
            },
            ..PlannerConfig::default()
        };
        let estimator = SeedEstimator::new(config.estimator).unwrap();
        let result = run_batch(&estimator, &config, None, &path, OutputFormat::Text);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(
            matches!(
                err,
                CliError::BatchFailed {
                    failed: 2,
                    total: 3,
                    exit_code: EXIT_INVALID_INPUT,
                }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn cached_plans_repeat() {
        let estimator = SeedEstimator::default();
        let mut cache = EstimateCache::new(NonZeroUsize::new(4).unwrap());
        let first = plan(&estimator, Some(&mut cache), None, 0.7, 15, 0.9).unwrap();
        let second = plan(&estimator, Some(&mut cache), None, 0.7, 15, 0.9).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);
    }
}
