//! Builtin commands: `quit`, `jobs`, `bg`, `fg`.
//!
//! Builtins run synchronously in the shell process and never fork.

mod bg;
mod fg;
mod jobs;
mod quit;

pub use bg::Bg;
pub use fg::Fg;
pub use jobs::Jobs;
pub use quit::Quit;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tsh_types::{ExecResult, JobId, JobInfo, JobState};

use crate::jobs::{Job, JobControl, JobTable};

/// What the read/evaluate loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the result and read the next line.
    Continue(ExecResult),
    /// Leave the shell with this status.
    Exit(i32),
}

/// A command the shell handles itself.
pub trait Builtin: Send + Sync {
    /// The name the user types.
    fn name(&self) -> &str;

    /// Run with the arguments that followed the name.
    fn execute(&self, args: &[String], jobs: &JobControl) -> Flow;
}

static BUILTINS: &[&dyn Builtin] = &[&Quit, &Jobs, &Bg, &Fg];

/// Find the builtin called `name`.
pub fn lookup(name: &str) -> Option<&'static dyn Builtin> {
    BUILTINS.iter().copied().find(|builtin| builtin.name() == name)
}

/// A `bg`/`fg` argument: `%<job_id>` or a bare pid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    Job { id: JobId, text: String },
    Process(Pid),
}

impl JobTarget {
    /// Parse the first argument of `cmd`.
    pub fn parse(cmd: &str, args: &[String]) -> Result<Self, String> {
        let Some(arg) = args.first() else {
            return Err(format!("{} command requires PID or %jobid argument", cmd));
        };

        let invalid = || format!("{}: argument must be a PID or %jobid", cmd);
        match arg.strip_prefix('%') {
            Some(digits) => digits
                .parse::<u32>()
                .map(|id| JobTarget::Job {
                    id: JobId(id),
                    text: arg.clone(),
                })
                .map_err(|_| invalid()),
            None => arg
                .parse::<i32>()
                .map(|raw| JobTarget::Process(Pid::from_raw(raw)))
                .map_err(|_| invalid()),
        }
    }

    /// Look the target up in the table.
    pub fn resolve<'a>(&self, table: &'a JobTable) -> Result<&'a Job, String> {
        match self {
            JobTarget::Job { id, text } => table
                .find_by_job_id(*id)
                .ok_or_else(|| format!("({}): No such job", text)),
            JobTarget::Process(pid) => table
                .find_by_pid(*pid)
                .ok_or_else(|| format!("({}): No such process", pid)),
        }
    }
}

/// Resolve the target of `cmd` and continue its whole process group in
/// `state`.
///
/// Lookup, the state change and SIGCONT happen in one critical section, so
/// the job cannot be reaped halfway through. Errors are user-facing lines.
fn resume(cmd: &str, args: &[String], jobs: &JobControl, state: JobState) -> Result<JobInfo, String> {
    let target = JobTarget::parse(cmd, args)?;
    jobs.update(|table| {
        let pid = target.resolve(table)?.pid;
        if !table.set_state(pid, state) {
            return Err(format!("{}: ({}): another job is in the foreground", cmd, pid));
        }
        killpg(pid, Signal::SIGCONT).map_err(|e| format!("{}: ({}): {}", cmd, pid, e))?;
        tracing::debug!(pid = %pid, ?state, "resumed job");
        table
            .find_by_pid(pid)
            .map(Job::info)
            .ok_or_else(|| format!("({}): No such process", pid))
    })
}
