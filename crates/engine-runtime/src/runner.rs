use crate::error::RuntimeError;
use chrono::Utc;
use engine_core::event_bus::bus::EventBus;
use engine_core::execution::job::{JobExecution, JobStatus};
use engine_core::execution::repository::JobRepository;
use engine_core::execution::step::Tasklet;
use engine_core::metrics::Metrics;
use model::core::identifiers::StepName;
use model::events::job::JobEvent;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs a job's tasklets sequentially against a durable execution record.
///
/// Cancellation is honored between steps only; a running step finishes its
/// current batch cadence on its own. A failed step fails the whole job,
/// with everything flushed so far left committed.
pub struct JobRunner {
    repository: Arc<dyn JobRepository>,
    events: EventBus,
    metrics: Metrics,
    cancel: CancellationToken,
}

impl JobRunner {
    pub fn new(
        repository: Arc<dyn JobRepository>,
        events: EventBus,
        metrics: Metrics,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            repository,
            events,
            metrics,
            cancel,
        }
    }

    pub async fn run(
        &self,
        mut execution: JobExecution,
        tasklets: Vec<Box<dyn Tasklet>>,
    ) -> Result<JobExecution, RuntimeError> {
        info!(job_id = %execution.id, job_name = %execution.job_name, "Starting job");
        execution.status = JobStatus::Running;
        execution.touch();
        self.repository.save(&execution).await?;
        self.events
            .publish(JobEvent::JobStarted {
                job_id: execution.id.clone(),
                job_name: execution.job_name.clone(),
                timestamp: Utc::now(),
            })
            .await;

        let total_steps = tasklets.len();
        for (idx, mut tasklet) in tasklets.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    step = tasklet.name(),
                    "Shutdown requested before step {}/{}, stopping with partial progress saved",
                    idx + 1,
                    total_steps
                );
                execution.status = JobStatus::Failed;
                execution.touch();
                self.repository.save(&execution).await?;
                return Err(RuntimeError::ShutdownRequested);
            }

            let step_name: StepName = tasklet.name().into();
            if execution.step(&step_name).is_none() {
                execution.add_step(step_name.clone());
            }
            let mut step = execution.step(&step_name).cloned().ok_or_else(|| {
                RuntimeError::Initialization(format!("step '{step_name}' not registered"))
            })?;
            step.trackable = tasklet.is_trackable();
            step.mark_started();
            info!(step = %step_name, "Starting step {}/{}", idx + 1, total_steps);
            self.events
                .publish(JobEvent::StepStarted {
                    job_id: execution.id.clone(),
                    step: step_name.clone(),
                    timestamp: Utc::now(),
                })
                .await;

            match tasklet.execute(&mut step).await {
                Ok(()) => {
                    step.mark_done();
                    let processed = step.processed_items;
                    if let Some(slot) = execution.step_mut(&step_name) {
                        *slot = step;
                    }
                    execution.touch();
                    self.repository.save(&execution).await?;
                    info!(step = %step_name, processed, "Step completed");
                    self.events
                        .publish(JobEvent::StepCompleted {
                            job_id: execution.id.clone(),
                            step: step_name,
                            processed,
                            timestamp: Utc::now(),
                        })
                        .await;
                }
                Err(err) => {
                    error!(step = %step_name, error = %err, "Step failed, aborting job");
                    step.mark_failed(&err);
                    if let Some(slot) = execution.step_mut(&step_name) {
                        *slot = step;
                    }
                    execution.status = JobStatus::Failed;
                    execution.touch();
                    self.repository.save(&execution).await?;
                    self.metrics.increment_failures(1);
                    self.events
                        .publish(JobEvent::StepFailed {
                            job_id: execution.id.clone(),
                            step: step_name.clone(),
                            error: err.to_string(),
                            timestamp: Utc::now(),
                        })
                        .await;
                    return Err(RuntimeError::StepFailed {
                        step: step_name.to_string(),
                        source: err,
                    });
                }
            }
        }

        execution.status = JobStatus::Done;
        execution.touch();
        self.repository.save(&execution).await?;
        self.metrics.increment_jobs(1);
        info!(job_id = %execution.id, "Job completed");
        self.events
            .publish(JobEvent::JobCompleted {
                job_id: execution.id.clone(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use engine_core::error::{SinkError, TaskletError};
    use engine_core::execution::job::{StepExecution, StepStage};
    use engine_core::execution::repository::SledJobRepository;
    use model::events::Event;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    struct CountingTasklet {
        name: &'static str,
        items: u64,
        fail: bool,
    }

    #[async_trait]
    impl Tasklet for CountingTasklet {
        fn name(&self) -> &str {
            self.name
        }

        fn is_trackable(&self) -> bool {
            true
        }

        async fn execute(&mut self, step: &mut StepExecution) -> Result<(), TaskletError> {
            step.set_total_items(self.items);
            step.increment_processed_items(self.items);
            if self.fail {
                return Err(TaskletError::Sink(SinkError::Save(
                    "storage unavailable".into(),
                )));
            }
            Ok(())
        }
    }

    fn execution_with_steps(steps: &[&str]) -> JobExecution {
        let mut execution = JobExecution::new("job-1", "compute_completeness");
        for step in steps {
            execution.add_step(*step);
        }
        execution
    }

    async fn runner(dir: &tempfile::TempDir) -> (JobRunner, Arc<dyn JobRepository>, Metrics) {
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let metrics = Metrics::new();
        let runner = JobRunner::new(
            repository.clone(),
            EventBus::new(),
            metrics.clone(),
            CancellationToken::new(),
        );
        (runner, repository, metrics)
    }

    #[tokio::test]
    async fn runs_steps_in_order_and_marks_done() {
        let dir = tempdir().unwrap();
        let (runner, repository, metrics) = runner(&dir).await;

        let tasklets: Vec<Box<dyn Tasklet>> = vec![
            Box::new(CountingTasklet {
                name: "first",
                items: 10,
                fail: false,
            }),
            Box::new(CountingTasklet {
                name: "second",
                items: 5,
                fail: false,
            }),
        ];
        let done = runner
            .run(execution_with_steps(&["first", "second"]), tasklets)
            .await
            .unwrap();

        assert_eq!(done.status, JobStatus::Done);
        assert_eq!(metrics.snapshot().jobs_completed, 1);

        let stored = repository.load(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Done);
        for step in &stored.steps {
            assert_eq!(step.stage, StepStage::Done);
            assert!(step.trackable);
            assert!(step.finished_at.is_some());
        }
    }

    #[tokio::test]
    async fn step_failure_fails_the_job_and_stops() {
        let dir = tempdir().unwrap();
        let (runner, repository, metrics) = runner(&dir).await;

        let tasklets: Vec<Box<dyn Tasklet>> = vec![
            Box::new(CountingTasklet {
                name: "first",
                items: 10,
                fail: true,
            }),
            Box::new(CountingTasklet {
                name: "second",
                items: 5,
                fail: false,
            }),
        ];
        let err = runner
            .run(execution_with_steps(&["first", "second"]), tasklets)
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::StepFailed { .. }));
        assert_eq!(metrics.snapshot().failure_count, 1);

        let stored = repository.load(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        let first = stored.step(&"first".into()).unwrap();
        assert_eq!(first.stage, StepStage::Failed);
        assert!(first.failure.as_deref().unwrap().contains("storage unavailable"));
        // Second step never ran.
        let second = stored.step(&"second".into()).unwrap();
        assert_eq!(second.stage, StepStage::Pending);
    }

    #[tokio::test]
    async fn cancellation_is_checked_between_steps() {
        let dir = tempdir().unwrap();
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let runner = JobRunner::new(
            repository.clone(),
            EventBus::new(),
            Metrics::new(),
            cancel,
        );

        let tasklets: Vec<Box<dyn Tasklet>> = vec![Box::new(CountingTasklet {
            name: "first",
            items: 10,
            fail: false,
        })];
        let err = runner
            .run(execution_with_steps(&["first"]), tasklets)
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ShutdownRequested));

        let stored = repository.load(&"job-1".into()).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.step(&"first".into()).unwrap().processed_items, 0);
    }

    #[tokio::test]
    async fn publishes_lifecycle_events_in_order() {
        let dir = tempdir().unwrap();
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let events = EventBus::new();
        let (tx, mut rx) = mpsc::channel(16);
        events.subscribe(tx).await;
        let runner = JobRunner::new(
            repository,
            events,
            Metrics::new(),
            CancellationToken::new(),
        );

        let tasklets: Vec<Box<dyn Tasklet>> = vec![Box::new(CountingTasklet {
            name: "first",
            items: 10,
            fail: false,
        })];
        runner
            .run(execution_with_steps(&["first"]), tasklets)
            .await
            .unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event.event_type());
        }
        assert_eq!(
            seen,
            vec![
                "job.started",
                "job.step_started",
                "job.step_completed",
                "job.completed"
            ]
        );
    }
}
