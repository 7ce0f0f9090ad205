use std::fmt;
use std::time::{Duration, Instant};

use crate::mode::{Mode, OptionId};
use crate::record::Batch;

/// Fixed upper bound on how long a submitted job is polled.
pub const MAX_WAIT: Duration = Duration::from_secs(90);
/// Spacing between two status queries for the same job.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Opaque identifier issued by the backend at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit of work handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub mode: Mode,
    pub option: Option<OptionId>,
    pub block_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Polling,
    Complete,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed | JobState::TimedOut)
    }
}

/// One submitted job. Moves `Submitted -> Polling -> {Complete | Failed | TimedOut}`
/// and never leaves a terminal state.
#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    state: JobState,
    submitted_at: Instant,
    deadline: Instant,
    result: Option<Batch>,
}

impl Job {
    pub fn new(id: JobId, submitted_at: Instant, max_wait: Duration) -> Self {
        Self {
            id,
            state: JobState::Submitted,
            submitted_at,
            deadline: submitted_at + max_wait,
            result: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn result(&self) -> Option<&Batch> {
        self.result.as_ref()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Returns false when the job already reached a terminal state.
    pub fn begin_polling(&mut self) -> bool {
        match self.state {
            JobState::Submitted | JobState::Polling => {
                self.state = JobState::Polling;
                true
            }
            _ => false,
        }
    }

    pub fn complete(&mut self, batch: Batch) -> bool {
        if !self.finish(JobState::Complete) {
            return false;
        }
        self.result = Some(batch);
        true
    }

    pub fn fail(&mut self) -> bool {
        self.finish(JobState::Failed)
    }

    pub fn time_out(&mut self) -> bool {
        self.finish(JobState::TimedOut)
    }

    /// The batch of a completed job; `None` for any other state.
    pub fn into_result(self) -> Option<Batch> {
        self.result
    }

    fn finish(&mut self, next: JobState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }
}
