use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to read payload file '{path}': {source}")]
    ReadPayload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Payload file '{path}' is too big: {size} / {max} bytes.")]
    PayloadTooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}' in '{url}'. Use http or https.")]
    UnsupportedScheme { url: String, scheme: String },
}
