use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use hifiasm_opts::{AsmConfig, CliError, Outcome, VERSION, process_command_line, usage};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match process_command_line(std::env::args_os()) {
        Ok(Outcome::HelpRequested(cfg)) => {
            eprint!("{}", usage::render(&cfg));
            ExitCode::SUCCESS
        }
        Ok(Outcome::VersionRequested) => {
            println!("{VERSION}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Ready(cfg)) => match hand_off(&cfg) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("[ERROR] {e:#}");
                ExitCode::FAILURE
            }
        },
        Err(e @ CliError::InputFileNotFound { .. }) => {
            // nothing downstream may run with a missing input
            eprintln!("[ERROR] {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("[ERROR] {e}");
            ExitCode::FAILURE
        }
    }
}

/// Pass the validated configuration on to the pipeline as JSON on stdout.
fn hand_off(cfg: &AsmConfig) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(cfg).context("Failed to serialize configuration")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write configuration")?;
    Ok(())
}
