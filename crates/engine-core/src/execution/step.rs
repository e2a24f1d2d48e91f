use crate::error::TaskletError;
use crate::execution::job::StepExecution;
use async_trait::async_trait;

/// One unit of work inside a job. The runner owns the step execution record
/// and hands it to the tasklet mutably for the duration of the run; the
/// tasklet updates counters and stage, the runner persists the outcome.
#[async_trait]
pub trait Tasklet: Send {
    fn name(&self) -> &str;

    /// Whether this tasklet reports a total item count up front.
    fn is_trackable(&self) -> bool {
        false
    }

    async fn execute(&mut self, step: &mut StepExecution) -> Result<(), TaskletError>;
}
