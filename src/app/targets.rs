use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};
use url::Url;

use crate::config::TargetDefaults;
use crate::domain::Target;
use crate::error::{AppError, AppResult, TargetError, ValidationError};

/// Where one target's payload comes from and where it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSource {
    pub file: PathBuf,
    pub url: String,
}

/// Turns the trailing `FILE URL ...` values into target sources.
///
/// No values selects the default file and URL, a single value is a file
/// sent to the default URL, and anything longer must be complete pairs.
///
/// # Errors
///
/// Returns an error when a file has no matching URL.
pub fn pair_targets(
    values: &[String],
    defaults: &TargetDefaults,
) -> Result<Vec<TargetSource>, ValidationError> {
    match values {
        [] => Ok(vec![TargetSource {
            file: defaults.file.clone(),
            url: defaults.url.clone(),
        }]),
        [file] => Ok(vec![TargetSource {
            file: PathBuf::from(file),
            url: defaults.url.clone(),
        }]),
        _ => values
            .chunks(2)
            .map(|pair| match pair {
                [file, url] => Ok(TargetSource {
                    file: PathBuf::from(file),
                    url: url.clone(),
                }),
                [file] => Err(ValidationError::UnpairedTarget { file: file.clone() }),
                _ => Err(ValidationError::NoTargets),
            })
            .collect(),
    }
}

/// Reads every payload and validates every URL before any request is sent.
///
/// # Errors
///
/// Returns an error when a payload file is unreadable or larger than
/// `max_payload_size`, or when a URL is not an absolute http(s) URL.
pub fn load_targets(sources: &[TargetSource], max_payload_size: u64) -> AppResult<Vec<Arc<Target>>> {
    if sources.is_empty() {
        return Err(AppError::validation(ValidationError::NoTargets));
    }
    sources
        .iter()
        .map(|source| load_target(source, max_payload_size).map(Arc::new))
        .collect()
}

fn load_target(source: &TargetSource, max_payload_size: u64) -> AppResult<Target> {
    let url = parse_target_url(&source.url)?;

    let read_error = |err| {
        AppError::target(TargetError::ReadPayload {
            path: source.file.clone(),
            source: err,
        })
    };
    let too_large = |size| {
        AppError::target(TargetError::PayloadTooLarge {
            path: source.file.clone(),
            size,
            max: max_payload_size,
        })
    };

    let size = std::fs::metadata(&source.file).map_err(read_error)?.len();
    if size > max_payload_size {
        return Err(too_large(size));
    }
    let payload = std::fs::read(&source.file).map_err(read_error)?;
    let read_size = u64::try_from(payload.len()).unwrap_or(u64::MAX);
    if read_size > max_payload_size {
        return Err(too_large(read_size));
    }

    info!(
        "Loading file {} ({} bytes) for {}",
        source.file.display(),
        read_size,
        url
    );
    debug!("{}", String::from_utf8_lossy(&payload));

    Ok(Target::new(url, Bytes::from(payload)))
}

fn parse_target_url(raw: &str) -> Result<Url, TargetError> {
    let url = Url::parse(raw).map_err(|err| TargetError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(TargetError::UnsupportedScheme {
            url: raw.to_owned(),
            scheme: scheme.to_owned(),
        }),
    }
}
