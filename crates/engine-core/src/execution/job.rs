use chrono::{DateTime, Utc};
use model::core::identifiers::{JobId, StepName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

/// Where a step currently is inside the pipeline. Persisted with the step
/// execution at batch granularity, so a poller sees the same transitions
/// the pipeline goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStage {
    Pending,
    ExtractingFamilies,
    Locating,
    Streaming,
    Done,
    Failed,
}

impl StepStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStage::Pending => "Pending",
            StepStage::ExtractingFamilies => "ExtractingFamilies",
            StepStage::Locating => "Locating",
            StepStage::Streaming => "Streaming",
            StepStage::Done => "Done",
            StepStage::Failed => "Failed",
        }
    }
}

impl fmt::Display for StepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution record of one step. The counters are the only externally
/// observable progress of a run; they advance once per batch flush, never
/// per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    pub name: StepName,
    pub stage: StepStage,
    /// Whether the step reports a total item count up front. Set by the
    /// runner from the tasklet; progress percentages are only computed
    /// for trackable steps.
    #[serde(default)]
    pub trackable: bool,
    pub total_items: Option<u64>,
    pub processed_items: u64,
    pub summary: BTreeMap<String, i64>,
    pub failure: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepExecution {
    pub fn new(name: impl Into<StepName>) -> Self {
        Self {
            name: name.into(),
            stage: StepStage::Pending,
            trackable: false,
            total_items: None,
            processed_items: 0,
            summary: BTreeMap::new(),
            failure: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn set_stage(&mut self, stage: StepStage) {
        self.stage = stage;
    }

    pub fn set_total_items(&mut self, total: u64) {
        self.total_items = Some(total);
    }

    pub fn increment_processed_items(&mut self, count: u64) {
        self.processed_items += count;
    }

    pub fn increment_summary_info(&mut self, key: &str, count: i64) {
        *self.summary.entry(key.to_string()).or_insert(0) += count;
    }

    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn mark_done(&mut self) {
        self.stage = StepStage::Done;
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: impl fmt::Display) {
        self.stage = StepStage::Failed;
        self.failure = Some(error.to_string());
        self.finished_at = Some(Utc::now());
    }
}

/// Execution record of a whole job: an ordered list of steps plus a status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExecution {
    pub id: JobId,
    pub job_name: String,
    pub status: JobStatus,
    pub steps: Vec<StepExecution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobExecution {
    pub fn new(id: impl Into<JobId>, job_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            job_name: job_name.into(),
            status: JobStatus::Pending,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_step(&mut self, name: impl Into<StepName>) -> &mut StepExecution {
        self.steps.push(StepExecution::new(name));
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    pub fn step(&self, name: &StepName) -> Option<&StepExecution> {
        self.steps.iter().find(|s| &s.name == name)
    }

    pub fn step_mut(&mut self, name: &StepName) -> Option<&mut StepExecution> {
        self.steps.iter_mut().find(|s| &s.name == name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut step = StepExecution::new("compute");
        step.set_total_items(250);
        step.increment_processed_items(100);
        step.increment_processed_items(100);
        step.increment_processed_items(50);
        step.increment_summary_info("process", 100);
        step.increment_summary_info("process", 150);

        assert_eq!(step.total_items, Some(250));
        assert_eq!(step.processed_items, 250);
        assert_eq!(step.summary.get("process"), Some(&250));
    }

    #[test]
    fn failure_records_stage_and_message() {
        let mut step = StepExecution::new("compute");
        step.mark_started();
        step.mark_failed("sink unavailable");

        assert_eq!(step.stage, StepStage::Failed);
        assert_eq!(step.failure.as_deref(), Some("sink unavailable"));
        assert!(step.finished_at.is_some());
    }

    #[test]
    fn steps_are_addressable_by_name() {
        let mut job = JobExecution::new("job-1", "compute_completeness");
        job.add_step("compute");

        assert!(job.step(&"compute".into()).is_some());
        assert!(job.step(&"missing".into()).is_none());
    }
}
