use std::path::PathBuf;
use std::time::Duration;

use crate::args::ChargeArgs;

/// Fallbacks and limits applied while loading targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDefaults {
    pub file: PathBuf,
    pub url: String,
    pub max_payload_size: u64,
}

impl From<&ChargeArgs> for TargetDefaults {
    fn from(args: &ChargeArgs) -> Self {
        Self {
            file: PathBuf::from(&args.default_file),
            url: args.default_url.clone(),
            max_payload_size: args.max_payload_size.get(),
        }
    }
}

/// Transport settings shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub content_type: String,
    pub soap_action: String,
    pub headers: Vec<(String, String)>,
}

impl From<&ChargeArgs> for ClientSettings {
    fn from(args: &ChargeArgs) -> Self {
        Self {
            connect_timeout: args.connect_timeout,
            request_timeout: args.request_timeout,
            content_type: args.content_type.clone(),
            soap_action: args.soap_action.clone(),
            headers: args.headers.clone(),
        }
    }
}
