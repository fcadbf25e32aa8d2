//! Core library for the `soapcharge` CLI.
//!
//! `soapcharge` posts SOAP/XML payloads to HTTP endpoints in synchronized
//! waves: every iteration fires `threads` identical requests at once and
//! waits for all of them before the next one starts. The crate exposes the
//! building blocks used by the binary: argument and config handling, target
//! loading, the request grid, the wave scheduler, and result aggregation.
pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
