//! ExecResult: what a builtin hands back to the evaluator.

/// The result of running one command line.
///
/// The evaluator writes `out` to stdout and `err` to stderr, each followed by a
/// newline when non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i32,
    /// Text for standard output.
    pub out: String,
    /// Text for standard error.
    pub err: String,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i32, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }

    /// Create a result with both output streams set.
    pub fn from_output(code: i32, out: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            code,
            out: out.into(),
            err: err.into(),
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}
