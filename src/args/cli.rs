use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_CONTENT_TYPE, DEFAULT_FILE, DEFAULT_MAX_PAYLOAD_SIZE,
    DEFAULT_SOAP_ACTION, DEFAULT_URL,
};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent SOAP/XML load generator - fires THREADS parallel POSTs per iteration, ITERATIONS times per target, and reports an HTTP status histogram.",
    after_help = "EXAMPLE:\n  soapcharge 10 100 soap.xml http://example.com"
)]
pub struct ChargeArgs {
    /// Number of sequential iterations (waves) per target
    #[arg(value_name = "ITERATIONS", value_parser = parse_positive_usize)]
    pub iterations: Option<PositiveUsize>,

    /// Number of concurrent requests in each iteration
    #[arg(value_name = "THREADS", value_parser = parse_positive_usize)]
    pub threads: Option<PositiveUsize>,

    /// Payload files and URLs as FILE URL pairs; a lone FILE is sent to --default-url
    #[arg(value_name = "FILE URL")]
    pub targets: Vec<String>,

    /// Keep response bodies and list every outcome (also sets log level to debug unless overridden by SOAPCHARGE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./soapcharge.toml or ./soapcharge.json if present.
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Connection timeout for each request (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = DEFAULT_CONNECT_TIMEOUT, value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Whole-request timeout (supports ms/s/m/h); unlimited when unset
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Maximum payload file size in bytes
    #[arg(long = "max-payload-size", default_value = DEFAULT_MAX_PAYLOAD_SIZE, value_parser = parse_positive_u64)]
    pub max_payload_size: PositiveU64,

    /// Payload file used when no FILE is given
    #[arg(long = "default-file", default_value = DEFAULT_FILE)]
    pub default_file: String,

    /// URL used when no URL is given
    #[arg(long = "default-url", default_value = DEFAULT_URL)]
    pub default_url: String,

    /// Content-Type header sent with every request
    #[arg(long = "content-type", default_value = DEFAULT_CONTENT_TYPE)]
    pub content_type: String,

    /// SOAPAction header sent with every request
    #[arg(long = "soap-action", default_value = DEFAULT_SOAP_ACTION)]
    pub soap_action: String,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Report format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
