// lockaudit CLI - headless self-storage lock audits

mod audit;
mod exit_codes;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use lockaudit_recon::FailOn;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lockaudit")]
#[command(about = "Reconcile unit, rent roll and lock reports; flag lock miscompares")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// More log output (-v info, -vv debug). Overridden by LOCKAUDIT_LOG.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an audit from a TOML config file (exit 0 = clean, exit 1 = miscompares)
    #[command(after_help = "\
Examples:
  lockaudit run site.audit.toml
  lockaudit run site.audit.toml --json
  lockaudit run site.audit.toml --output result.json --miscompares miscompares.csv
  lockaudit run site.audit.toml --fail-on medium")]
    Run {
        /// Path to the .audit.toml config file
        config: PathBuf,

        /// Print the JSON report to stdout (summary still goes to stderr)
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write miscompare rows, highest severity first, to a CSV file
        #[arg(long, value_name = "CSV")]
        miscompares: Option<PathBuf>,

        /// Lowest severity that fails the run (overrides the config's fail_on)
        #[arg(long, value_enum)]
        fail_on: Option<FailOnArg>,
    },

    /// Validate an audit config without running
    #[command(after_help = "\
Examples:
  lockaudit validate site.audit.toml")]
    Validate {
        /// Path to the .audit.toml config file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnArg {
    None,
    Medium,
    High,
}

impl From<FailOnArg> for FailOn {
    fn from(arg: FailOnArg) -> Self {
        match arg {
            FailOnArg::None => FailOn::None,
            FailOnArg::Medium => FailOn::Medium,
            FailOnArg::High => FailOn::High,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  lockaudit-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  lockaudit-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(quiet: bool, verbose: u8) -> Result<(), CliError> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LOCKAUDIT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Engine logs go through the `log` facade; the subscriber bridges them.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::usage(format!("failed to initialize logging: {e}")))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = init_logging(cli.quiet, cli.verbose).and_then(|()| match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: lockaudit <command> [options]");
            eprintln!("       lockaudit --help for more information");
            Ok(())
        }
        Some(Commands::Run { config, json, output, miscompares, fail_on }) => audit::cmd_run(
            config,
            audit::RunOptions { json, output, miscompares, fail_on: fail_on.map(FailOn::from) },
        ),
        Some(Commands::Validate { config }) => audit::cmd_validate(config),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }
}
