//! Error types for the tsh kernel.

use thiserror::Error;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors that stop the shell from starting.
///
/// Mistakes in user input never surface here; they become an
/// [`ExecResult`](tsh_types::ExecResult) failure and the prompt comes back.
#[derive(Debug, Error)]
pub enum ShellError {
    /// I/O error (runtime setup).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A signal stream could not be registered.
    #[error("failed to install {signal} handler: {source}")]
    SignalSetup {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Why an external program was not launched.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Nothing executable by that name on the search path.
    #[error("{0}: Command not found.")]
    NotFound(String),

    /// Every job slot is taken.
    #[error("Tried to create too many jobs")]
    TooManyJobs,

    /// The process started but the table would not take it; it has been
    /// killed.
    #[error("{name}: could not track process {pid}")]
    Untracked { name: String, pid: i32 },

    /// The OS refused to create the process (resource exhaustion and the like).
    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
