mod commands;
mod helpers;

use clap::Parser;
use peakcal_core::domain::PeakcalError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic_error = error.as_peakcal_error();
            eprintln!("{}", diagnostic_error.diagnostic_line());
            eprintln!("{}", diagnostic_error.fatal_exit_line());
            diagnostic_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("peakcal".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
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
    name = "peakcal",
    version,
    about = "Weighted peak energies for detector gain calibration"
)]
struct Cli {
    /// Log pipeline details to stderr (overrides PEAKCAL_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Estimate the weighted energy of every peak in a calibration request
    Estimate(commands::EstimateArgs),
    /// Print interpolated mass attenuation coefficients for one material
    Attenuation(commands::AttenuationArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Estimate(args) => commands::run_estimate_command(args),
        CliCommand::Attenuation(args) => commands::run_attenuation_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(PeakcalError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PeakcalError> for CliError {
    fn from(error: PeakcalError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_peakcal_error(&self) -> PeakcalError {
        match self {
            Self::Usage(message) => {
                PeakcalError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => PeakcalError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
