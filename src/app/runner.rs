use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::info;

use crate::{
    args::ChargeArgs,
    config::{ClientSettings, TargetDefaults},
    domain::RequestGrid,
    engine::WaveScheduler,
    error::{AppError, AppResult, ValidationError},
    http::{HttpExecutor, RequestExecutor, build_client},
    metrics::{RunReport, aggregate},
};

use super::summary;
use super::targets::{load_targets, pair_targets};

pub struct RunOutput {
    pub report: RunReport,
    pub started_at: DateTime<Utc>,
    /// Wall-clock time of the wave sequence only; setup and reporting are excluded.
    pub elapsed: Duration,
}

/// Loads targets, runs every wave, and reports the result.
///
/// # Errors
///
/// Returns an error for setup failures (missing counts, unreadable or
/// oversized payloads, bad URLs, client construction) and when the report
/// cannot be written. Individual request failures are never errors.
pub async fn run_charge(args: &ChargeArgs) -> AppResult<()> {
    let iterations = args
        .iterations
        .ok_or_else(|| AppError::validation(ValidationError::MissingIterations))?;
    let threads = args
        .threads
        .ok_or_else(|| AppError::validation(ValidationError::MissingThreads))?;

    let defaults = TargetDefaults::from(args);
    let sources = pair_targets(&args.targets, &defaults)?;
    let targets = load_targets(&sources, defaults.max_payload_size)?;
    let grid = RequestGrid::build(targets, iterations, threads)?;

    let client = build_client(&ClientSettings::from(args))?;
    let executor = Arc::new(HttpExecutor::new(client, args.verbose));

    info!(
        "Starting {} iteration(s) of {} concurrent request(s) for {} target(s)",
        iterations.get(),
        threads.get(),
        grid.targets().len()
    );

    let output = execute_grid(executor, &grid, args.verbose).await?;
    let rendered = summary::render(&output, &grid, args.output_format)?;
    summary::emit(&rendered, args.output.as_deref())
}

/// Runs the scheduler over `grid`, timing only the waves, then aggregates.
///
/// # Errors
///
/// Returns an error only on internal grid/store inconsistencies.
pub async fn execute_grid<E>(
    executor: Arc<E>,
    grid: &RequestGrid,
    verbose: bool,
) -> AppResult<RunOutput>
where
    E: RequestExecutor + ?Sized,
{
    let scheduler = WaveScheduler::new(executor);
    let started_at = Utc::now();
    let start = Instant::now();
    let store = scheduler.run(grid).await?;
    let elapsed = start.elapsed();

    let report = aggregate(&store, verbose)?;
    Ok(RunOutput {
        report,
        started_at,
        elapsed,
    })
}
