use std::collections::BTreeMap;

use serde::Serialize;

use super::histogram::{LatencyHistogram, LatencySummary};
use super::types::{Outcome, TransportFailure};
use crate::domain::Coordinate;
use crate::engine::ResultStore;
use crate::error::{AppError, AppResult, EngineError};

/// Occurrences per status code, including the no-response sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusHistogram {
    counts: BTreeMap<u16, u64>,
}

impl StatusHistogram {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, status_code: u16) {
        let count = self.counts.entry(status_code).or_insert(0);
        *count = count.saturating_add(1);
    }

    #[must_use]
    pub fn count(&self, status_code: u16) -> u64 {
        self.counts.get(&status_code).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    /// Codes in ascending order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts.iter().map(|(code, count)| (*code, *count))
    }

    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<u16, u64> {
        &self.counts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub target: usize,
    pub iteration: usize,
    pub thread: usize,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TransportFailure>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl OutcomeRecord {
    fn new(coordinate: Coordinate, outcome: &Outcome) -> Self {
        Self {
            target: coordinate.target,
            iteration: coordinate.iteration,
            thread: coordinate.thread,
            status_code: outcome.status_code,
            failure: outcome.failure,
            latency_ms: outcome.latency_ms(),
            body: outcome.body.clone(),
        }
    }

    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.target, self.iteration, self.thread)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_requests: u64,
    pub transport_failures: u64,
    pub histogram: StatusHistogram,
    pub latency: LatencySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<OutcomeRecord>>,
}

/// Scans every cell of a completed store once and summarizes it. With
/// `verbose`, every outcome is also listed in coordinate order.
///
/// # Errors
///
/// Returns an error when the store still has empty cells or the latency
/// histogram rejects a value.
pub fn aggregate(store: &ResultStore, verbose: bool) -> AppResult<RunReport> {
    let missing = store.missing_count();
    if missing > 0 {
        return Err(AppError::engine(EngineError::IncompleteStore { missing }));
    }

    let mut histogram = StatusHistogram::new();
    let mut latency = LatencyHistogram::new()?;
    let mut transport_failures: u64 = 0;
    let mut outcomes = verbose.then(|| Vec::with_capacity(store.len()));

    for (coordinate, outcome) in store.iter() {
        histogram.record(outcome.status_code);
        if outcome.failure.is_some() {
            transport_failures = transport_failures.saturating_add(1);
        }
        latency.record(outcome.elapsed)?;
        if let Some(records) = outcomes.as_mut() {
            records.push(OutcomeRecord::new(coordinate, outcome));
        }
    }

    Ok(RunReport {
        total_requests: histogram.total(),
        transport_failures,
        histogram,
        latency: latency.summary(),
        outcomes,
    })
}
