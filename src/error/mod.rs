mod app;
mod config;
mod engine;
mod http;
mod metrics;
mod target;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use engine::EngineError;
pub use http::HttpError;
pub use metrics::MetricsError;
pub use target::TargetError;
pub use validation::ValidationError;
