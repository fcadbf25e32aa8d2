use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::run_charge;
use crate::args::ChargeArgs;
use crate::config::{DEFAULT_CONFIG_FILES, apply_config, load_config};
use crate::error::{AppError, AppResult};

/// Parses the command line, merges the config file, and runs the charge.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, when targets
/// cannot be loaded, or when the runtime cannot be started.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    let merged = merge_config(&mut args, &matches);
    crate::logger::init_logging(args.verbose, args.no_color);
    merged.inspect_err(|err| tracing::error!("{}", err))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_charge(&args)).inspect_err(|err| {
        tracing::error!("{}", err);
    })
}

fn parse_args() -> AppResult<Option<(ChargeArgs, ArgMatches)>> {
    let mut cmd = ChargeArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = ChargeArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn merge_config(args: &mut ChargeArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(args, matches, &config).map_err(AppError::config)?;
    }
    Ok(())
}
