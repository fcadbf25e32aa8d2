//! Request outcomes and their aggregation into a status histogram.
mod aggregate;
mod histogram;
mod types;


pub use aggregate::{OutcomeRecord, RunReport, StatusHistogram, aggregate};
pub use histogram::{LatencyHistogram, LatencySummary};
pub use types::{NO_RESPONSE_STATUS, Outcome, TransportFailure};
