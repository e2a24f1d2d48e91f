use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Failed to initialize reader: {0}")]
    Initialize(String),

    #[error("Failed to read next item: {0}")]
    Read(String),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unsupported filter on field '{field}' with operator '{operator}'")]
    UnsupportedFilter { field: String, operator: String },

    #[error("Query execution failed: {0}")]
    Execution(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to decode stored record: {0}")]
    Decode(String),

    #[error("Unknown {kind} '{code}'")]
    UnknownResource { kind: &'static str, code: String },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to save completeness results: {0}")]
    Save(String),
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Failed to persist job execution '{job_id}': {reason}")]
    Save { job_id: String, reason: String },

    #[error("Failed to load job execution '{job_id}': {reason}")]
    Load { job_id: String, reason: String },

    #[error("Unknown job execution '{0}'")]
    UnknownJob(String),

    #[error("Unknown step '{step}' in job execution '{job_id}'")]
    UnknownStep { job_id: String, step: String },
}

/// Failure of one tasklet run. Any variant is fatal for the run: earlier
/// flushed batches stay committed, the remainder is not processed.
#[derive(Error, Debug)]
pub enum TaskletError {
    #[error("Upstream reader yielded a '{got}' record where a '{expected}' was required")]
    UnexpectedRecord {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Cursor yielded a '{got}' document where a '{expected}' was required")]
    UnexpectedDocument {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Reader error: {0}")]
    Reader(#[from] ReaderError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to resolve product identifiers: {0}")]
    Resolve(#[source] StoreError),

    #[error("Completeness calculation failed: {0}")]
    Calculate(#[source] StoreError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Job repository error: {0}")]
    Repository(#[from] RepositoryError),
}
