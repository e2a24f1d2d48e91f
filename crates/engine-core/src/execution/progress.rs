use crate::error::RepositoryError;
use crate::execution::job::{JobStatus, StepStage};
use crate::execution::repository::JobRepository;
use chrono::{DateTime, Utc};
use model::core::identifiers::JobId;
use serde::Serialize;
use std::sync::Arc;

/// Read-side view over the job repository, for pollers. Reflects state at
/// batch granularity because that is how often the pipeline persists.
#[derive(Clone)]
pub struct ProgressService {
    repository: Arc<dyn JobRepository>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepProgress {
    pub step: String,
    pub stage: StepStage,
    pub processed: u64,
    pub total: Option<u64>,
    pub percentage: Option<u8>,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub job_id: JobId,
    pub job_name: String,
    pub status: JobStatus,
    pub steps: Vec<StepProgress>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressService {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub async fn report(&self, job_id: &JobId) -> Result<Option<ProgressReport>, RepositoryError> {
        let Some(execution) = self.repository.load(job_id).await? else {
            return Ok(None);
        };

        let steps = execution
            .steps
            .iter()
            .map(|step| {
                // Untrackable steps have no meaningful total to report against.
                let percentage = step
                    .total_items
                    .filter(|_| step.trackable)
                    .map(|total| {
                        if total == 0 {
                            100
                        } else {
                            (step.processed_items.min(total) * 100 / total) as u8
                        }
                    });
                StepProgress {
                    step: step.name.to_string(),
                    stage: step.stage,
                    processed: step.processed_items,
                    total: step.total_items,
                    percentage,
                    failure: step.failure.clone(),
                }
            })
            .collect();

        Ok(Some(ProgressReport {
            job_id: execution.id.clone(),
            job_name: execution.job_name.clone(),
            status: execution.status,
            steps,
            updated_at: execution.updated_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::job::JobExecution;
    use crate::execution::repository::SledJobRepository;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reports_percentage_from_counters() {
        let dir = tempdir().unwrap();
        let repo: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let service = ProgressService::new(repo.clone());

        let mut execution = JobExecution::new("job-1", "compute_completeness");
        let step = execution.add_step("compute");
        step.trackable = true;
        step.set_stage(StepStage::Streaming);
        step.set_total_items(250);
        step.increment_processed_items(100);
        repo.save(&execution).await.unwrap();

        let report = service.report(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].percentage, Some(40));
        assert_eq!(report.steps[0].stage, StepStage::Streaming);
    }

    #[tokio::test]
    async fn untrackable_steps_report_no_percentage() {
        let dir = tempdir().unwrap();
        let repo: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let service = ProgressService::new(repo.clone());

        let mut execution = JobExecution::new("job-1", "compute_completeness");
        let step = execution.add_step("compute");
        step.set_total_items(250);
        step.increment_processed_items(100);
        repo.save(&execution).await.unwrap();

        let report = service.report(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(report.steps[0].percentage, None);
        assert_eq!(report.steps[0].total, Some(250));
    }

    #[tokio::test]
    async fn unknown_job_reports_none() {
        let dir = tempdir().unwrap();
        let repo: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let service = ProgressService::new(repo);

        assert!(service.report(&"ghost".into()).await.unwrap().is_none());
    }
}
