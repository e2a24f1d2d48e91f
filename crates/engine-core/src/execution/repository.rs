use crate::error::RepositoryError;
use crate::execution::job::{JobExecution, StepExecution};
use async_trait::async_trait;
use model::core::identifiers::JobId;
use std::path::Path;

/// Durable store of job execution records. Updated once per batch flush by
/// the pipeline and at lifecycle boundaries by the runner.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, execution: &JobExecution) -> Result<(), RepositoryError>;

    async fn load(&self, job_id: &JobId) -> Result<Option<JobExecution>, RepositoryError>;

    /// Persists the current state of one step inside an existing execution.
    async fn update_step_execution(
        &self,
        job_id: &JobId,
        step: &StepExecution,
    ) -> Result<(), RepositoryError>;
}

pub struct SledJobRepository {
    db: sled::Db,
}

impl SledJobRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    #[inline]
    fn job_key(job_id: &JobId) -> String {
        format!("job:{}", job_id)
    }

    fn save_err(job_id: &JobId, reason: impl ToString) -> RepositoryError {
        RepositoryError::Save {
            job_id: job_id.to_string(),
            reason: reason.to_string(),
        }
    }

    fn load_err(job_id: &JobId, reason: impl ToString) -> RepositoryError {
        RepositoryError::Load {
            job_id: job_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl JobRepository for SledJobRepository {
    async fn save(&self, execution: &JobExecution) -> Result<(), RepositoryError> {
        let key = Self::job_key(&execution.id);
        let bytes =
            bincode::serialize(execution).map_err(|e| Self::save_err(&execution.id, e))?;
        self.db
            .insert(key, bytes)
            .map_err(|e| Self::save_err(&execution.id, e))?;
        Ok(())
    }

    async fn load(&self, job_id: &JobId) -> Result<Option<JobExecution>, RepositoryError> {
        let key = Self::job_key(job_id);
        match self.db.get(key).map_err(|e| Self::load_err(job_id, e))? {
            Some(bytes) => {
                let execution =
                    bincode::deserialize(&bytes).map_err(|e| Self::load_err(job_id, e))?;
                Ok(Some(execution))
            }
            None => Ok(None),
        }
    }

    async fn update_step_execution(
        &self,
        job_id: &JobId,
        step: &StepExecution,
    ) -> Result<(), RepositoryError> {
        let mut execution = self
            .load(job_id)
            .await?
            .ok_or_else(|| RepositoryError::UnknownJob(job_id.to_string()))?;

        let slot = execution
            .step_mut(&step.name)
            .ok_or_else(|| RepositoryError::UnknownStep {
                job_id: job_id.to_string(),
                step: step.name.to_string(),
            })?;
        *slot = step.clone();
        execution.touch();

        self.save(&execution).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::job::StepStage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let repo = SledJobRepository::open(dir.path()).unwrap();

        let mut execution = JobExecution::new("job-1", "compute_completeness");
        execution.add_step("compute");
        repo.save(&execution).await.unwrap();

        let loaded = repo.load(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(loaded.job_name, "compute_completeness");
        assert_eq!(loaded.steps.len(), 1);

        assert!(repo.load(&"missing".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_step_persists_counters() {
        let dir = tempdir().unwrap();
        let repo = SledJobRepository::open(dir.path()).unwrap();

        let mut execution = JobExecution::new("job-1", "compute_completeness");
        execution.add_step("compute");
        repo.save(&execution).await.unwrap();

        let mut step = execution.steps[0].clone();
        step.set_stage(StepStage::Streaming);
        step.set_total_items(250);
        step.increment_processed_items(100);
        repo.update_step_execution(&execution.id, &step)
            .await
            .unwrap();

        let loaded = repo.load(&execution.id).await.unwrap().unwrap();
        let loaded_step = loaded.step(&"compute".into()).unwrap();
        assert_eq!(loaded_step.stage, StepStage::Streaming);
        assert_eq!(loaded_step.processed_items, 100);
        assert_eq!(loaded_step.total_items, Some(250));
    }

    #[tokio::test]
    async fn update_step_of_unknown_job_fails() {
        let dir = tempdir().unwrap();
        let repo = SledJobRepository::open(dir.path()).unwrap();

        let step = StepExecution::new("compute");
        let err = repo
            .update_step_execution(&"ghost".into(), &step)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownJob(_)));
    }
}
