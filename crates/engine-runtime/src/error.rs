use engine_core::error::{RepositoryError, StoreError, TaskletError};
use engine_core::validation::Violation;
use thiserror::Error;

/// Top-level errors of the completeness engine runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("Invalid job configuration: [{}]", .0.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
    InvalidConfig(Vec<Violation>),

    #[error("Unknown family '{0}'")]
    UnknownFamily(String),

    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: TaskletError,
    },

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
