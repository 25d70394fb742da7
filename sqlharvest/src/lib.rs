//! Library module for the `sqlharvest` binary.
//!
//! This module exposes the command line for testing purposes.
//! The binary entry point is in main.rs.

use clap::{CommandFactory, Parser};
use sqlharvest_core::{
    DEFAULT_OUTPUT_DIR, HarvestError, HarvestOptions, Result, RunSummary, Target, harvest,
    init_logging,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Exit status for argument errors and an empty target list.
pub const USAGE_EXIT_CODE: u8 = 1;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "sqlharvest")]
#[command(about = "Collect .sql files from directories and git repositories")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "
SQLHarvest - Gather SQL statement files into one flat directory

Every target is either a local directory or a git repository URL
(anything starting with http://, https:// or git@). Repositories are
shallow-cloned into a temporary directory that is removed afterwards.
Every *.sql file found, at any depth, is copied unchanged into the
output directory under a fresh <uuid>.sql name.

A failing target or file is reported and skipped; the rest of the
batch still runs.

EXAMPLES:
  sqlharvest ./service-a ./service-b
  sqlharvest -o pool https://github.com/acme/billing.git git@github.com:acme/auth.git
")]
pub struct Cli {
    /// Output directory
    #[arg(
        short,
        long,
        value_name = "OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory where collected files are written"
    )]
    pub output: PathBuf,

    /// Targets to harvest
    #[arg(
        value_name = "TARGET",
        help = "Local directories or git repository URLs to harvest"
    )]
    pub targets: Vec<OsString>,
}

impl Cli {
    /// Converts parsed arguments into the target list and run options.
    ///
    /// Temporary clones go to the current working directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no target was given.
    pub fn into_request(self) -> Result<(Vec<Target>, HarvestOptions)> {
        if self.targets.is_empty() {
            return Err(HarvestError::configuration(
                "At least one target is required",
            ));
        }

        let targets = self.targets.into_iter().map(Target::new).collect();
        let options = HarvestOptions::new().with_output_dir(self.output);
        Ok((targets, options))
    }
}

/// Parses `args`, runs the harvest and returns the process exit code.
///
/// Argument errors and an empty target list exit with
/// [`USAGE_EXIT_CODE`]; `--help` and `--version` exit successfully. Once the
/// harvest starts the exit code is always success: per-target and per-file
/// failures are only logged.
pub async fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match execute(args).await {
        Ok(summary) => {
            debug!(
                "{} of {} target(s) completed, {} file(s) written",
                summary.completed, summary.targets, summary.files_written
            );
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

/// Same as [`run`] but hands back the run summary.
///
/// # Errors
///
/// Returns the exit code to use when arguments are rejected or `--help` /
/// `--version` short-circuits the run.
pub async fn execute<I, T>(args: I) -> std::result::Result<RunSummary, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
            if let Err(print_error) = e.print() {
                eprintln!("Error: {print_error}");
            }
            return Err(code);
        }
    };

    let (targets, options) = match cli.into_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", Cli::command().render_usage());
            return Err(ExitCode::from(USAGE_EXIT_CODE));
        }
    };

    // A second initialization (e.g. from tests) is harmless
    if let Err(e) = init_logging() {
        eprintln!("Warning: {e}");
    }

    Ok(harvest(targets, options).await)
}
