use crate::error::ReaderError;
use async_trait::async_trait;
use model::catalog::record::CatalogRecord;

/// Pull-based reader of catalog records. `read` returns `None` once the
/// upstream is exhausted; after that every call keeps returning `None`.
#[async_trait]
pub trait ItemReader: Send + Sync {
    /// Called once before the first `read`.
    async fn initialize(&mut self) -> Result<(), ReaderError> {
        Ok(())
    }

    async fn read(&mut self) -> Result<Option<CatalogRecord>, ReaderError>;
}
