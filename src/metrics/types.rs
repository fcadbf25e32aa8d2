use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Status recorded when no HTTP response was obtained.
pub const NO_RESPONSE_STATUS: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    ConnectTimeout,
    Timeout,
    Connect,
    Body,
    Aborted,
    Other,
}

impl TransportFailure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportFailure::ConnectTimeout => "connect timeout",
            TransportFailure::Timeout => "timeout",
            TransportFailure::Connect => "connection failed",
            TransportFailure::Body => "body read failed",
            TransportFailure::Aborted => "aborted",
            TransportFailure::Other => "transport error",
        }
    }

    /// Classifies a transport error returned by the HTTP client.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_connect() && err.is_timeout() {
            TransportFailure::ConnectTimeout
        } else if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if err.is_body() || err.is_decode() {
            TransportFailure::Body
        } else {
            TransportFailure::Other
        }
    }
}

/// Result of one request attempt. Written once, when the attempt finishes.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status_code: u16,
    pub body: Option<String>,
    pub failure: Option<TransportFailure>,
    pub started: Instant,
    pub elapsed: Duration,
}

impl Outcome {
    #[must_use]
    pub fn response(started: Instant, status_code: u16, body: Option<String>) -> Self {
        Self {
            status_code,
            body,
            failure: None,
            started,
            elapsed: started.elapsed(),
        }
    }

    #[must_use]
    pub fn failed(started: Instant, failure: TransportFailure) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            body: None,
            failure: Some(failure),
            started,
            elapsed: started.elapsed(),
        }
    }

    /// The server answered but the body could not be read in full.
    #[must_use]
    pub fn truncated(started: Instant, status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
            failure: Some(TransportFailure::Body),
            started,
            elapsed: started.elapsed(),
        }
    }

    #[must_use]
    pub fn finished(&self) -> Instant {
        self.started
            .checked_add(self.elapsed)
            .unwrap_or(self.started)
    }

    #[must_use]
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}
