use clap::Parser;
use std::process::ExitCode;

use crate::color::ColorMode;
use crate::error::INVALID_ARGUMENTS_EXIT_CODE;

/// Create a `{github-user}-{ticket}-{summary}` branch from the freshly pulled primary branch
///
/// Prints the created branch name on stdout; everything else goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "create-branch", version, long_about = None)]
pub struct CreateBranchCli {
    /// Ticket identifier, e.g. PROJ-123 or issue-42
    pub ticket: String,

    /// Short description of the change
    pub summary: String,

    /// Print every step to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// When to use colored output
    #[arg(long, value_name = "WHEN", ignore_case = true)]
    pub color: Option<ColorMode>,
}

/// Print the review and discussion comments of the current branch's open PR as JSON
///
/// The JSON document is the only thing written to stdout.
#[derive(Parser, Debug)]
#[command(name = "fetch-pr-comments", version, long_about = None)]
pub struct FetchCommentsCli {
    /// Print every step to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// When to use colored output
    #[arg(long, value_name = "WHEN", ignore_case = true)]
    pub color: Option<ColorMode>,
}

/// Parse process arguments, mapping usage errors to the invalid-arguments code
///
/// `--help` and `--version` print their text and yield a successful exit.
///
/// # Errors
/// Returns the exit code to terminate with when parsing did not produce a value.
pub fn parse_args<T: Parser>() -> Result<T, ExitCode> {
    T::try_parse().map_err(|err| {
        let _ = err.print();
        if err.use_stderr() {
            ExitCode::from(INVALID_ARGUMENTS_EXIT_CODE)
        } else {
            ExitCode::SUCCESS
        }
    })
}
