use std::sync::Arc;

use futures_util::future::join_all;
use tokio::time::Instant;
use tracing::{debug, error};

use super::store::ResultStore;
use crate::domain::{Coordinate, RequestGrid, RequestPlan};
use crate::error::EngineError;
use crate::http::RequestExecutor;
use crate::metrics::{Outcome, TransportFailure};

/// Runs a request grid wave by wave: targets in order, iterations in order,
/// and every thread-slot of one iteration concurrently. A wave is joined in
/// full before the next one is spawned, so at most `threads` requests are
/// in flight at any time.
pub struct WaveScheduler<E: ?Sized> {
    executor: Arc<E>,
}

impl<E> WaveScheduler<E>
where
    E: RequestExecutor + ?Sized,
{
    #[must_use]
    pub const fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Executes every plan of `grid` and returns the filled store.
    ///
    /// Request failures never end the run; they are recorded as outcomes.
    ///
    /// # Errors
    ///
    /// Returns an error only if the grid and store disagree on shape, which
    /// would be a bug in grid construction.
    pub async fn run(&self, grid: &RequestGrid) -> Result<ResultStore, EngineError> {
        let shape = grid.shape();
        let mut store = ResultStore::new(shape)?;

        for (target, iteration) in shape.waves() {
            let wave = grid
                .wave(target, iteration)
                .ok_or(EngineError::MissingWave { target, iteration })?;
            let wave_started = Instant::now();
            let outcomes = self.run_wave(wave).await;
            let failures = outcomes
                .iter()
                .filter(|(_, outcome)| outcome.failure.is_some())
                .count();
            for (coordinate, outcome) in outcomes {
                store.record(coordinate, outcome)?;
            }
            debug!(
                target_index = target,
                iteration,
                requests = wave.len(),
                failures,
                elapsed_ms = wave_started.elapsed().as_millis(),
                "Wave finished"
            );
        }

        Ok(store)
    }

    async fn run_wave(&self, wave: &[RequestPlan]) -> Vec<(Coordinate, Outcome)> {
        let spawned = Instant::now();
        let handles = wave.iter().map(|plan| {
            let executor = Arc::clone(&self.executor);
            let plan = plan.clone();
            tokio::spawn(async move { executor.execute(&plan).await })
        });

        // Barrier: every task of this wave completes before we return.
        let results = join_all(handles).await;

        wave.iter()
            .zip(results)
            .map(|(plan, result)| {
                let outcome = result.unwrap_or_else(|err| {
                    error!(
                        "Request task {} did not complete: {}",
                        plan.coordinate(),
                        err
                    );
                    Outcome::failed(spawned, TransportFailure::Aborted)
                });
                (plan.coordinate(), outcome)
            })
            .collect()
    }
}
