use std::process::ExitCode;

/// Exit status of a run.
///
/// - `Success` (0): the worklist drained without a fatal error
/// - `Failure` (1): an error propagated to the top level
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
        }
    }
}
