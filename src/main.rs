use std::process::ExitCode;

use clap::Parser;
use modsplit::cli::{Arguments, ExitStatus, report};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match modsplit::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            report::print_failure(&err);
            ExitStatus::Failure.into()
        }
    }
}
