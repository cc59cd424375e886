//! Command-line front end of the hifiasm assembler: turns an argument vector
//! into a validated [`AsmConfig`] and provides the between-round hooks the
//! pipeline uses to adjust it.

pub mod cli;
pub mod configs;
pub mod error;
pub mod inputs;
pub mod usage;
pub mod utils;
pub mod validate;

use std::ffi::OsString;

pub use configs::{AsmConfig, RoundCounters};
pub use error::{CliError, Result, ValidationError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a command line that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Options parsed, inputs found, invariants hold.
    Ready(AsmConfig),
    /// Carries the options given before the help flag, for the usage screen.
    HelpRequested(AsmConfig),
    VersionRequested,
}

/// Parse, resolve and validate `args` (program name first).
///
/// Only [`CliError::InputFileNotFound`] is fatal; the caller is expected to
/// stop the run on any error but must not continue past a fatal one.
pub fn process_command_line<I, T>(args: I) -> Result<Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cfg = AsmConfig::default();
    let positionals = match cli::dispatch(args, &mut cfg)? {
        cli::Dispatch::Continue(positionals) => positionals,
        cli::Dispatch::HelpRequested => return Ok(Outcome::HelpRequested(cfg)),
        cli::Dispatch::VersionRequested => return Ok(Outcome::VersionRequested),
    };
    inputs::resolve_read_files(positionals, &mut cfg)?;
    validate::check_options(&cfg)?;
    Ok(Outcome::Ready(cfg))
}
