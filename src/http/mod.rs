//! HTTP transport: client construction and single-request execution.
mod client;
mod executor;


pub use client::build_client;
pub use executor::{HttpExecutor, RequestExecutor};
