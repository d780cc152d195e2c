//! Job tracking for tsh.
//!
//! [`JobTable`] is plain data. [`JobControl`] is the one shared instance the
//! evaluator and the signal relay both hold: every read and write of the
//! table goes through it, under its lock, and every write wakes anyone
//! waiting on the foreground job.

mod table;

pub use table::{Job, JobTable, MAX_JOBS};

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use nix::unistd::Pid;
use tsh_types::JobState;

/// Shared, lock-guarded job table.
#[derive(Debug)]
pub struct JobControl {
    table: Mutex<JobTable>,
    changed: Condvar,
}

impl JobControl {
    /// Create a job control handle with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            table: Mutex::new(JobTable::new(capacity)),
            changed: Condvar::new(),
        }
    }

    /// Read the table under the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&JobTable) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the table under the lock, then wake foreground waiters.
    ///
    /// The closure is the whole critical section: a relay event arriving in
    /// the meantime is handled only after it returns.
    pub fn update<R>(&self, f: impl FnOnce(&mut JobTable) -> R) -> R {
        let result = f(&mut self.lock());
        self.changed.notify_all();
        result
    }

    /// Block until `pid` no longer names a foreground job.
    ///
    /// Returns the job's state afterwards, or `None` if it was reaped.
    pub fn wait_foreground(&self, pid: Pid) -> Option<JobState> {
        let guard = self
            .changed
            .wait_while(self.lock(), |table| is_foreground(table, pid))
            .unwrap_or_else(PoisonError::into_inner);
        guard.find_by_pid(pid).map(|job| job.state)
    }

    fn lock(&self) -> MutexGuard<'_, JobTable> {
        // Every mutation touches a single slot, so a panic mid-update cannot
        // leave a half-written job behind.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for JobControl {
    fn default() -> Self {
        Self::new(MAX_JOBS)
    }
}

fn is_foreground(table: &JobTable, pid: Pid) -> bool {
    table
        .find_by_pid(pid)
        .is_some_and(|job| job.state == JobState::Foreground)
}
