//! bg: continue a job in the background.

use tsh_types::{ExecResult, JobState};

use super::{resume, Builtin, Flow};
use crate::jobs::JobControl;

/// Bg builtin: send SIGCONT to the job's group and mark it Running.
///
/// Re-announces the job with the same line a fresh `&` launch prints. A job
/// that is already running in the background is simply continued again.
pub struct Bg;

impl Builtin for Bg {
    fn name(&self) -> &str {
        "bg"
    }

    fn execute(&self, args: &[String], jobs: &JobControl) -> Flow {
        let result = match resume("bg", args, jobs, JobState::Background) {
            Ok(info) => ExecResult::success(info.announcement()),
            Err(message) => ExecResult::from_output(1, message, ""),
        };
        Flow::Continue(result)
    }
}
