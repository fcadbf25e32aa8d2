use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::RequestPlan;
use crate::metrics::{Outcome, TransportFailure};

/// Performs the single attempt behind one plan.
///
/// Implementations never fail: transport problems are folded into the
/// returned [`Outcome`] and nothing is retried.
#[async_trait]
pub trait RequestExecutor: Send + Sync + 'static {
    async fn execute(&self, plan: &RequestPlan) -> Outcome;
}

/// POSTs the plan's payload with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    keep_bodies: bool,
}

impl HttpExecutor {
    /// `keep_bodies` retains each response body in its outcome; otherwise
    /// bodies are drained and dropped.
    #[must_use]
    pub const fn new(client: Client, keep_bodies: bool) -> Self {
        Self {
            client,
            keep_bodies,
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, plan: &RequestPlan) -> Outcome {
        let started = Instant::now();
        // The payload goes out as one complete buffer; it is never re-read.
        let request = self.client.post(plan.url().clone()).body(plan.payload());

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let failure = TransportFailure::from_reqwest(&err);
                debug!(
                    "Request {} to {} failed ({}): {}",
                    plan.coordinate(),
                    plan.url(),
                    failure.as_str(),
                    err
                );
                return Outcome::failed(started, failure);
            }
        };

        let status = response.status().as_u16();
        let body_result = if self.keep_bodies {
            read_body(response).await.map(Some)
        } else {
            drain_body(response).await.map(|drained| {
                debug!("Discarded {} body bytes for {}", drained, plan.coordinate());
                None
            })
        };

        match body_result {
            Ok(body) => Outcome::response(started, status, body),
            Err(err) => {
                debug!(
                    "Failed to read response body for {}: {}",
                    plan.coordinate(),
                    err
                );
                Outcome::truncated(started, status)
            }
        }
    }
}

async fn read_body(response: Response) -> Result<String, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

async fn drain_body(response: Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
