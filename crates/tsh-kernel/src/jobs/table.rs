//! The job table: a fixed number of slots, each holding at most one job.
//!
//! Pure data. Nothing here touches processes or signals; the owner decides
//! when a mutation happens (see [`super::JobControl`]).

use nix::unistd::Pid;
use tsh_types::{JobId, JobInfo, JobState};

/// Default number of slots.
pub const MAX_JOBS: usize = 16;

/// One tracked child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub id: JobId,
    pub state: JobState,
    pub command: String,
}

impl Job {
    /// Snapshot for listing.
    pub fn info(&self) -> JobInfo {
        JobInfo {
            id: self.id,
            pid: self.pid.as_raw(),
            state: self.state,
            command: self.command.clone(),
        }
    }
}

/// Fixed-capacity, ordered collection of job slots.
#[derive(Debug, Clone)]
pub struct JobTable {
    slots: Vec<Option<Job>>,
    next_id: u32,
}

impl JobTable {
    /// Create a table with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        let mut table = Self {
            slots: Vec::new(),
            next_id: 1,
        };
        table.slots.resize(capacity.max(1), None);
        table
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Empty one slot. Out-of-range indices are ignored.
    pub fn clear(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    /// Empty every slot and restart job numbering at 1.
    pub fn init(&mut self) {
        for slot in 0..self.slots.len() {
            self.clear(slot);
        }
        self.next_id = 1;
    }

    /// Largest job id in use, 0 when the table is empty.
    pub fn max_job_id(&self) -> u32 {
        self.jobs().map(|job| job.id.0).max().unwrap_or(0)
    }

    /// Register a job in the first empty slot.
    ///
    /// Returns false if `pid` is not a real process id, the table is full, or
    /// `state` is Foreground while another job already is.
    pub fn add(&mut self, pid: Pid, state: JobState, command: impl Into<String>) -> bool {
        if pid.as_raw() < 1 {
            return false;
        }
        if state == JobState::Foreground && self.foreground_pid().is_some() {
            return false;
        }
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return false;
        };

        let id = self.allocate_id();
        self.slots[index] = Some(Job {
            pid,
            id,
            state,
            command: command.into(),
        });
        tracing::debug!(job = %id, pid = %pid, ?state, "added job");
        true
    }

    /// Remove the job for `pid`. Returns false if no slot holds it.
    pub fn delete(&mut self, pid: Pid) -> bool {
        let Some(index) = self.slot_of(pid) else {
            return false;
        };
        self.clear(index);
        self.next_id = self.max_job_id() + 1;
        tracing::debug!(pid = %pid, "deleted job");
        true
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.slot_of(pid).and_then(|index| self.slots[index].as_ref())
    }

    pub fn find_by_pid_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.slot_of(pid).and_then(|index| self.slots[index].as_mut())
    }

    pub fn find_by_job_id(&self, id: JobId) -> Option<&Job> {
        if id.0 < 1 {
            return None;
        }
        self.jobs().find(|job| job.id == id)
    }

    /// Pid of the job currently in the foreground, if any.
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.jobs()
            .find(|job| job.state == JobState::Foreground)
            .map(|job| job.pid)
    }

    pub fn pid_to_job_id(&self, pid: Pid) -> Option<JobId> {
        self.find_by_pid(pid).map(|job| job.id)
    }

    /// Change the state of the job for `pid`.
    ///
    /// Returns false if no slot holds it, or if it would become a second
    /// Foreground job.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> bool {
        if state == JobState::Foreground && self.foreground_pid().is_some_and(|fg| fg != pid) {
            return false;
        }
        match self.find_by_pid_mut(pid) {
            Some(job) => {
                job.state = state;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all occupied slots, in slot order.
    pub fn list(&self) -> Vec<JobInfo> {
        self.jobs().map(Job::info).collect()
    }

    fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.slots.iter().flatten()
    }

    fn slot_of(&self, pid: Pid) -> Option<usize> {
        if pid.as_raw() < 1 {
            return None;
        }
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|job| job.pid == pid))
    }

    fn id_in_use(&self, id: u32) -> bool {
        self.jobs().any(|job| job.id.0 == id)
    }

    /// Hand out the next job id, wrapping to 1 past capacity and skipping ids
    /// still held by a live slot.
    fn allocate_id(&mut self) -> JobId {
        let capacity = self.capacity() as u32;
        let mut candidate = self.next_id.max(1);
        // The caller guarantees a free slot, so a free id exists in 1..=capacity.
        for _ in 0..=capacity {
            if candidate > capacity {
                candidate = 1;
            }
            if !self.id_in_use(candidate) {
                break;
            }
            candidate += 1;
        }
        self.next_id = candidate + 1;
        if self.next_id > capacity {
            self.next_id = 1;
        }
        JobId(candidate)
    }
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new(MAX_JOBS)
    }
}
