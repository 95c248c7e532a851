use std::path::PathBuf;

use encoding_rs::Encoding;

/// How to launch one external tool stage. Built once per stage, then
/// discarded with the stage's outcome.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Stage name used in logs and error messages ("render", "convert").
    pub stage: &'static str,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// encoding_rs label for the tool's console output; `None` means UTF-8
    /// with lossy replacement.
    pub output_encoding: Option<String>,
}

impl ToolSpec {
    /// `None` also for labels encoding_rs does not know; the supervisor
    /// falls back to lossy UTF-8 in that case.
    pub fn resolve_encoding(&self) -> Option<&'static Encoding> {
        self.output_encoding
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
    }
}

/// Terminal outcome of one supervised tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit code 0; progress was forced to completion.
    Completed,
    /// Nonzero exit; the bar was left at the last observed position.
    Failed { exit_code: i32 },
    /// User cancellation; the child was terminated and reaped.
    Interrupted,
    /// The tool could not be started at all (missing, not executable).
    SpawnFailed { reason: String },
}
