use crate::core::identifiers::{JobId, StepName};
use crate::events::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted over the lifecycle of a job execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// Emitted when the runner starts a job.
    JobStarted {
        job_id: JobId,
        job_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a step begins executing.
    StepStarted {
        job_id: JobId,
        step: StepName,
        timestamp: DateTime<Utc>,
    },

    /// Emitted after each successful batch flush. This is the only
    /// progress signal during a run; consumers see batch granularity.
    BatchFlushed {
        job_id: JobId,
        step: StepName,
        batch_size: u64,
        processed: u64,
        total: Option<u64>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a step finishes successfully.
    StepCompleted {
        job_id: JobId,
        step: StepName,
        processed: u64,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a step fails; the job stops here.
    StepFailed {
        job_id: JobId,
        step: StepName,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the whole job completes.
    JobCompleted {
        job_id: JobId,
        timestamp: DateTime<Utc>,
    },
}

impl Event for JobEvent {
    fn event_type(&self) -> &'static str {
        match self {
            JobEvent::JobStarted { .. } => "job.started",
            JobEvent::StepStarted { .. } => "job.step_started",
            JobEvent::BatchFlushed { .. } => "job.batch_flushed",
            JobEvent::StepCompleted { .. } => "job.step_completed",
            JobEvent::StepFailed { .. } => "job.step_failed",
            JobEvent::JobCompleted { .. } => "job.completed",
        }
    }
}

impl JobEvent {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobEvent::JobStarted { job_id, .. }
            | JobEvent::StepStarted { job_id, .. }
            | JobEvent::BatchFlushed { job_id, .. }
            | JobEvent::StepCompleted { job_id, .. }
            | JobEvent::StepFailed { job_id, .. }
            | JobEvent::JobCompleted { job_id, .. } => job_id,
        }
    }
}
