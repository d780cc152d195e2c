//! The Shell: evaluates one command line at a time.
//!
//! The Shell owns the job table and the signal relay that keeps it current:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        Shell                         │
//! │  eval(line) ──► tokenizer ──► builtin │ launcher     │
//! │                                   │        │         │
//! │                                   ▼        ▼         │
//! │                        Arc<JobControl> (lock+condvar)│
//! │                                   ▲                  │
//! │   tokio runtime ── SignalRelay ───┘                  │
//! │   (SIGCHLD, SIGINT, SIGTSTP, SIGQUIT)                │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use nix::sys::signal::{killpg, Signal};
use tokio::runtime::Runtime;
use tsh_types::{ExecResult, JobState};

use crate::builtins::{self, Flow};
use crate::config::ShellConfig;
use crate::error::{LaunchError, ShellResult};
use crate::jobs::{Job, JobControl};
use crate::launcher;
use crate::relay::SignalRelay;
use crate::tokenizer::{parse_line, ParsedLine};

/// A job-control shell instance.
///
/// There should be one per process: the relay reaps any child of the
/// process, not just the ones this shell launched.
pub struct Shell {
    config: ShellConfig,
    jobs: Arc<JobControl>,
    // Keeps the relay task alive.
    _runtime: Runtime,
}

impl Shell {
    /// Create the job table and start the signal relay.
    pub fn new(config: ShellConfig) -> ShellResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tsh-signal-relay")
            .enable_all()
            .build()?;

        let jobs = Arc::new(JobControl::new(config.max_jobs));
        let relay = {
            let _guard = runtime.enter();
            SignalRelay::install(jobs.clone())?
        };
        runtime.spawn(relay.run());

        Ok(Self {
            config,
            jobs,
            _runtime: runtime,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Evaluate one input line, print its output, and say whether to go on.
    ///
    /// Builtins run in place. Anything else is launched as a job; a
    /// foreground job blocks this call until it leaves the foreground.
    #[tracing::instrument(level = "info", skip(self, line), fields(input_len = line.len()))]
    pub fn eval(&self, line: &str) -> Flow {
        let command_line = line.trim_end_matches(['\n', '\r']);
        let Some(parsed) = parse_line(command_line) else {
            return Flow::Continue(ExecResult::default());
        };
        let Some(program) = parsed.program() else {
            return Flow::Continue(ExecResult::default());
        };

        let flow = match builtins::lookup(program) {
            Some(builtin) => builtin.execute(&parsed.argv[1..], &self.jobs),
            None => Flow::Continue(self.launch(&parsed, command_line)),
        };

        if let Flow::Continue(result) = &flow {
            print_result(result);
        }
        flow
    }

    /// Start an external program as a new job.
    fn launch(&self, parsed: &ParsedLine, command_line: &str) -> ExecResult {
        let state = if parsed.background {
            JobState::Background
        } else {
            JobState::Foreground
        };

        // Spawn and registration share one critical section: a child that
        // dies instantly is reaped only after its slot exists.
        let launched = self.jobs.update(|table| {
            if table.is_full() {
                return Err(LaunchError::TooManyJobs);
            }
            let pid = launcher::spawn(&parsed.argv)?;
            let info = if table.add(pid, state, command_line) {
                table.find_by_pid(pid).map(Job::info)
            } else {
                None
            };
            info.ok_or_else(|| {
                if let Err(e) = killpg(pid, Signal::SIGKILL) {
                    tracing::warn!("failed to kill untracked process group {}: {}", pid, e);
                }
                LaunchError::Untracked {
                    name: parsed.argv[0].clone(),
                    pid: pid.as_raw(),
                }
            })
        });

        let info = match launched {
            Ok(info) => info,
            // A full table is reported on stdout, like the other job errors.
            Err(e @ LaunchError::TooManyJobs) => return ExecResult::from_output(1, e.to_string(), ""),
            Err(e @ LaunchError::NotFound(_)) => return ExecResult::failure(127, e.to_string()),
            Err(e) => return ExecResult::failure(1, e.to_string()),
        };

        if self.config.verbose {
            println!("Added job [{}] {} {}", info.id, info.pid, info.command);
        }

        if parsed.background {
            return ExecResult::success(info.announcement());
        }

        self.jobs.wait_foreground(nix::unistd::Pid::from_raw(info.pid));
        ExecResult::success("")
    }
}

fn print_result(result: &ExecResult) {
    if !result.out.is_empty() {
        println!("{}", result.out);
    }
    if !result.err.is_empty() {
        eprintln!("{}", result.err);
    }
}
