//! Job identification and state types.

use std::fmt;

/// Small integer identifying a job, as written in `%N` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a tracked job.
///
/// Transitions:
/// - `Foreground -> Stopped` on ctrl-z
/// - `Stopped -> Foreground` via `fg`
/// - `Stopped -> Background` via `bg`
/// - `Background -> Foreground` via `fg`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Undefined,
    /// Owns the shell's attention; the prompt waits for it.
    Foreground,
    /// Running without blocking the prompt.
    Background,
    /// Suspended by a stop signal.
    Stopped,
}

impl JobState {
    /// Label used by the `jobs` listing.
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Undefined => "Undefined",
            JobState::Foreground => "Foreground",
            JobState::Background => "Running",
            JobState::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of one occupied job slot, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    /// Job ID.
    pub id: JobId,
    /// OS process ID (also the process group ID).
    pub pid: i32,
    /// State at the time of the snapshot.
    pub state: JobState,
    /// Command line as typed.
    pub command: String,
}

impl JobInfo {
    /// The line printed when a job starts (or resumes) in the background:
    /// `[<job_id>] (<pid>) <command_line>`.
    pub fn announcement(&self) -> String {
        format!("[{}] ({}) {}", self.id, self.pid, self.command)
    }
}

/// Renders the `jobs` listing line: `[<job_id>] (<pid>) <Label> <command_line>`.
impl fmt::Display for JobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {} {}", self.id, self.pid, self.state, self.command)
    }
}
