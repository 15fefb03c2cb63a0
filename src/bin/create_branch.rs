use std::process::ExitCode;

use agent_dev_helpers::cli::{parse_args, CreateBranchCli};
use agent_dev_helpers::color::{ColorMode, Reporter};
use agent_dev_helpers::commands::create_branch::cmd_create_branch;

fn main() -> ExitCode {
    let cli: CreateBranchCli = match parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    let reporter = Reporter::new(ColorMode::resolve(cli.color), cli.verbose);

    match cmd_create_branch(&cli.ticket, &cli.summary, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            reporter.error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
