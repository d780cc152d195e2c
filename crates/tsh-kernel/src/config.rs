//! Shell configuration.

use crate::jobs::MAX_JOBS;

/// Default prompt, printed before every read.
pub const DEFAULT_PROMPT: &str = "tsh> ";

/// Configuration for shell initialization.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Prompt string.
    pub prompt: String,

    /// Whether to print the prompt before each line.
    ///
    /// Turned off by `-p`, which test drivers use so that stdout carries only
    /// command output.
    pub emit_prompt: bool,

    /// Extra diagnostics (`-v`): announce every job as it is registered.
    pub verbose: bool,

    /// Number of job slots.
    pub max_jobs: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl ShellConfig {
    /// Config for a human at a terminal: prompt on, quiet.
    pub fn interactive() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            emit_prompt: true,
            verbose: false,
            max_jobs: MAX_JOBS,
        }
    }

    /// Set whether the prompt is printed.
    pub fn with_emit_prompt(mut self, emit: bool) -> Self {
        self.emit_prompt = emit;
        self
    }

    /// Set verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
