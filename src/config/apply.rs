use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{ChargeArgs, PositiveU64, PositiveUsize, parse_header};
use crate::error::ConfigError;

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Values given on the
/// command line are left untouched.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut ChargeArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "iterations")
        && let Some(iterations) = config.iterations
    {
        args.iterations = Some(ensure_positive_usize(iterations, "iterations")?);
    }

    if !is_cli(matches, "threads")
        && let Some(threads) = config.threads
    {
        args.threads = Some(ensure_positive_usize(threads, "threads")?);
    }

    if !is_cli(matches, "targets")
        && let Some(targets) = config.targets.as_ref()
    {
        args.targets = targets
            .iter()
            .flat_map(|target| [target.file.clone(), target.url.clone()])
            .collect();
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = Some(to_duration(timeout, "timeout")?);
    }

    if !is_cli(matches, "max_payload_size")
        && let Some(size) = config.max_payload_size
    {
        args.max_payload_size = ensure_positive_u64(size, "max_payload_size")?;
    }

    if !is_cli(matches, "default_file")
        && let Some(file) = config.default_file.clone()
    {
        args.default_file = file;
    }

    if !is_cli(matches, "default_url")
        && let Some(url) = config.default_url.clone()
    {
        args.default_url = url;
    }

    if !is_cli(matches, "content_type")
        && let Some(content_type) = config.content_type.clone()
    {
        args.content_type = content_type;
    }

    if !is_cli(matches, "soap_action")
        && let Some(soap_action) = config.soap_action.clone()
    {
        args.soap_action = soap_action;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header).map_err(|err| ConfigError::InvalidHeader { source: err })?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &'static str) -> Result<PositiveU64, ConfigError> {
    PositiveU64::try_from(value).map_err(|err| ConfigError::FieldMustBePositive { field, source: err })
}

fn ensure_positive_usize(value: usize, field: &'static str) -> Result<PositiveUsize, ConfigError> {
    PositiveUsize::try_from(value)
        .map_err(|err| ConfigError::FieldMustBePositive { field, source: err })
}

fn to_duration(
    value: &DurationValue,
    field: &'static str,
) -> Result<std::time::Duration, ConfigError> {
    value
        .to_duration()
        .map_err(|err| ConfigError::InvalidDuration { field, source: err })
}
