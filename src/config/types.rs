use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_arg};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub iterations: Option<usize>,
    pub threads: Option<usize>,
    pub targets: Option<Vec<TargetConfig>>,
    pub verbose: Option<bool>,
    pub connect_timeout: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub max_payload_size: Option<u64>,
    pub default_file: Option<String>,
    pub default_url: Option<String>,
    pub content_type: Option<String>,
    pub soap_action: Option<String>,
    pub headers: Option<Vec<String>>,
    pub output_format: Option<OutputFormat>,
    pub output: Option<String>,
    pub no_color: Option<bool>,
}

/// One `[[targets]]` entry: the payload file and where to POST it.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub file: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
