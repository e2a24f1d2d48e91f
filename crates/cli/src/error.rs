use engine_core::error::{RepositoryError, StoreError};
use engine_runtime::error::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the fixture file: {0}")]
    FixtureRead(#[from] std::io::Error),

    #[error("Failed to parse the fixture file as JSON: {0}")]
    FixtureParse(#[from] serde_json::Error),

    #[error("Failed to run the job: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Catalog store error: {0}")]
    Store(#[from] StoreError),

    #[error("Job repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Unknown job execution '{0}'")]
    UnknownJob(String),

    #[error("Unknown product '{0}'")]
    UnknownProduct(String),

    #[error("Invalid resource kind '{0}', expected product, family, attribute or channel")]
    InvalidResourceKind(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
