mod commands;

use anyhow::Context;
use clap::Parser;
use fincheck_core::VerifyError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub fn run_from_env() -> i32 {
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let verify_error = error.as_verify_error();
            eprintln!("{}", verify_error.diagnostic_line());
            eprintln!("{}", verify_error.fatal_exit_line());
            verify_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("fincheck".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose)?;
            commands::run_verify_command(cli.verify)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "fincheck",
    version,
    about = "Verify recorded amortization calculator outputs for one fixture case"
)]
struct Cli {
    #[command(flatten)]
    verify: commands::VerifyArgs,

    /// Log verification steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Logs go to stderr so stdout carries only the confirmation line.
fn init_tracing(verbose: bool) -> Result<(), CliError> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse(&directives)
        .with_context(|| format!("invalid {} filter '{}'", EnvFilter::DEFAULT_ENV, directives))?;

    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Verify(VerifyError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_verify_error(&self) -> VerifyError {
        match self {
            Self::Usage(message) => {
                VerifyError::invalid_invocation("CLI.USAGE", message.trim_end().to_string())
            }
            Self::Verify(error) => error.clone(),
            Self::Internal(error) => VerifyError::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
