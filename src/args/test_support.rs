use clap::Parser;

use super::ChargeArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> Result<ChargeArgs, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ChargeArgs::try_parse_from(args).map_err(|err| format!("parse failed: {}", err))
}
