//! fg: continue a job in the foreground and wait for it.

use tsh_types::{ExecResult, JobState};

use super::{resume, Builtin, Flow};
use crate::jobs::JobControl;

/// Fg builtin: send SIGCONT to the job's group, mark it Foreground, and block
/// until it exits, dies, or stops again.
pub struct Fg;

impl Builtin for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn execute(&self, args: &[String], jobs: &JobControl) -> Flow {
        let result = match resume("fg", args, jobs, JobState::Foreground) {
            Ok(info) => {
                let pid = nix::unistd::Pid::from_raw(info.pid);
                jobs.wait_foreground(pid);
                ExecResult::success("")
            }
            Err(message) => ExecResult::from_output(1, message, ""),
        };
        Flow::Continue(result)
    }
}
