use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;

use crate::error::MetricsError;

/// Latency statistics of a run, in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub min_ms: u64,
    pub avg_ms: u64,
    pub max_ms: u64,
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
}

/// Millisecond latency distribution over every outcome of a run.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
    sum_ms: u128,
}

impl LatencyHistogram {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be allocated.
    pub fn new() -> Result<Self, MetricsError> {
        let hist = Histogram::<u64>::new(3).map_err(|err| MetricsError::Histogram {
            context: "create",
            source: Box::new(err),
        })?;
        Ok(Self { hist, sum_ms: 0 })
    }

    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency: Duration) -> Result<(), MetricsError> {
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.hist
            .record(latency_ms)
            .map_err(|err| MetricsError::Histogram {
                context: "record",
                source: Box::new(err),
            })?;
        self.sum_ms = self.sum_ms.saturating_add(u128::from(latency_ms));
        Ok(())
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    /// All zeros when nothing was recorded.
    #[must_use]
    pub fn summary(&self) -> LatencySummary {
        let count = self.count();
        if count == 0 {
            return LatencySummary::default();
        }
        let avg_ms = self
            .sum_ms
            .checked_div(u128::from(count))
            .map_or(0, |avg| u64::try_from(avg).unwrap_or(u64::MAX));
        LatencySummary {
            min_ms: self.hist.min(),
            avg_ms,
            max_ms: self.hist.max(),
            p50_ms: self.hist.value_at_quantile(0.5),
            p90_ms: self.hist.value_at_quantile(0.9),
            p99_ms: self.hist.value_at_quantile(0.99),
        }
    }
}
