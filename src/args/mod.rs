//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::ChargeArgs;
pub use types::{OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use defaults::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_CONTENT_TYPE, DEFAULT_FILE, DEFAULT_MAX_PAYLOAD_SIZE,
    DEFAULT_SOAP_ACTION, DEFAULT_URL, DEFAULT_USER_AGENT,
};
pub(crate) use parsers::{parse_duration_arg, parse_header};
