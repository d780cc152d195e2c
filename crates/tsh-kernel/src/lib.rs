//! tsh-kernel: the job-control core of tsh.
//!
//! This crate provides:
//!
//! - **Tokenizer**: splits an input line into arguments and a background flag
//! - **Jobs**: the bounded job table and the lock that guards it
//! - **Launcher**: starts external programs in their own process group
//! - **Relay**: turns SIGCHLD, SIGINT and SIGTSTP into job-table updates; SIGQUIT ends the shell
//! - **Builtins**: `quit`, `jobs`, `bg`, `fg`
//! - **Shell**: the evaluator tying it all together

pub mod builtins;
pub mod config;
pub mod error;
pub mod jobs;
pub mod launcher;
pub mod relay;
pub mod shell;
pub mod tokenizer;

pub use builtins::Flow;
pub use config::ShellConfig;
pub use error::{LaunchError, ShellError, ShellResult};
pub use jobs::{JobControl, JobTable, MAX_JOBS};
pub use shell::Shell;

pub use tsh_types::{ExecResult, JobId, JobInfo, JobState};
