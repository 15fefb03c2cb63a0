use std::process::ExitCode;

use agent_dev_helpers::cli::{parse_args, FetchCommentsCli};
use agent_dev_helpers::color::{ColorMode, Reporter};
use agent_dev_helpers::commands::fetch_comments::cmd_fetch_comments;

fn main() -> ExitCode {
    let cli: FetchCommentsCli = match parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    let reporter = Reporter::new(ColorMode::resolve(cli.color), cli.verbose);

    match cmd_fetch_comments(&reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            reporter.error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
