use anyhow::Result;

mod args;
mod exit_status;
pub mod report;
mod run;
pub mod trace;

pub use args::{Arguments, OutputFormat};
pub use exit_status::ExitStatus;
pub use run::{RunOutcome, RunReport};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    match run::run(&args)? {
        RunOutcome::Init => {
            report::print_init();
            Ok(ExitStatus::Success)
        }
        RunOutcome::Run(result) => Ok(report::print_run(&result, args.format, args.verbose)),
    }
}
