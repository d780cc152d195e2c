//! Signal relay: OS signals in, job-table updates and forwarded signals out.
//!
//! tokio's signal driver does the only work that happens inside the real
//! signal handler (it records that the signal arrived). Everything else runs
//! here, on an ordinary task, so it may lock the job table and print.
//!
//! | signal  | action                                                     |
//! |---------|------------------------------------------------------------|
//! | SIGCHLD | drain every pending child status change                    |
//! | SIGINT  | forward to the foreground job's process group              |
//! | SIGTSTP | forward to the foreground job's process group              |
//! | SIGQUIT | terminate the shell                                        |

use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};
use tsh_types::JobState;

use crate::error::{ShellError, ShellResult};
use crate::jobs::{JobControl, JobTable};

/// Event loop translating delivered signals into job control actions.
pub struct SignalRelay {
    jobs: Arc<JobControl>,
    sigchld: SignalStream,
    sigint: SignalStream,
    sigtstp: SignalStream,
    sigquit: SignalStream,
}

impl SignalRelay {
    /// Register the signal streams. Must be called inside a tokio runtime.
    ///
    /// From this point the shell no longer dies on ctrl-c or ctrl-z; those
    /// signals are queued for [`run`](Self::run).
    pub fn install(jobs: Arc<JobControl>) -> ShellResult<Self> {
        Ok(Self {
            jobs,
            sigchld: listen("SIGCHLD", SignalKind::child())?,
            sigint: listen("SIGINT", SignalKind::interrupt())?,
            sigtstp: listen("SIGTSTP", SignalKind::from_raw(Signal::SIGTSTP as i32))?,
            sigquit: listen("SIGQUIT", SignalKind::quit())?,
        })
    }

    /// Process signals until the streams close.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(()) = self.sigchld.recv() => self.reap_children(),
                Some(()) = self.sigint.recv() => forward_to_foreground(&self.jobs, Signal::SIGINT),
                Some(()) = self.sigtstp.recv() => forward_to_foreground(&self.jobs, Signal::SIGTSTP),
                Some(()) = self.sigquit.recv() => {
                    println!("Terminating after receipt of SIGQUIT signal");
                    std::process::exit(1);
                }
                else => break,
            }
        }
        tracing::debug!("signal relay stopped");
    }

    /// Collect every child that has exited, died, or stopped, without
    /// waiting for children that have not changed state.
    ///
    /// SIGCHLD deliveries coalesce, so one wake-up may stand for several
    /// children.
    fn reap_children(&self) {
        loop {
            let status = match waitpid(None, Some(WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
                Ok(status) => status,
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    tracing::warn!("waitpid failed: {}", e);
                    break;
                }
            };

            // Print while still holding the table so the message lands before
            // the foreground waiter wakes and the next prompt appears.
            self.jobs.update(|table| {
                if let Some(message) = apply_wait_status(table, status) {
                    println!("{}", message);
                }
            });
        }
    }
}

fn listen(name: &'static str, kind: SignalKind) -> ShellResult<SignalStream> {
    signal(kind).map_err(|source| ShellError::SignalSetup { signal: name, source })
}

/// Apply one child status change to the table.
///
/// Returns the line to show the user, if any: normal exits are silent, deaths
/// by signal and stops are announced. Untracked children are ignored.
pub fn apply_wait_status(table: &mut JobTable, status: WaitStatus) -> Option<String> {
    match status {
        WaitStatus::Exited(pid, code) => {
            tracing::debug!(pid = %pid, code, "child exited");
            table.delete(pid);
            None
        }
        WaitStatus::Signaled(pid, signal, _) => {
            let id = table.pid_to_job_id(pid);
            table.delete(pid);
            id.map(|id| format!("Job [{}] ({}) terminated by signal {}", id, pid, signal as i32))
        }
        WaitStatus::Stopped(pid, signal) => {
            let id = table.pid_to_job_id(pid)?;
            table.set_state(pid, JobState::Stopped);
            Some(format!("Job [{}] ({}) stopped by signal {}", id, pid, signal as i32))
        }
        other => {
            tracing::trace!(?other, "ignoring wait status");
            None
        }
    }
}

/// Send `signal` to the whole process group of the foreground job, if there
/// is one. The resulting table change arrives later through SIGCHLD.
pub fn forward_to_foreground(jobs: &JobControl, signal: Signal) {
    let Some(pid) = jobs.inspect(JobTable::foreground_pid) else {
        return;
    };
    tracing::debug!(pid = %pid, ?signal, "forwarding to foreground job");
    if let Err(e) = killpg(pid, signal) {
        tracing::warn!("failed to forward {:?} to process group {}: {}", signal, pid, e);
    }
}
