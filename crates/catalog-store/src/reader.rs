use async_trait::async_trait;
use engine_core::error::ReaderError;
use engine_core::reader::ItemReader;
use model::catalog::family::Family;
use model::catalog::record::CatalogRecord;
use std::collections::VecDeque;

/// Reader over a materialized record list. The completeness pipeline is fed
/// one of these holding the family records of an updated family set.
pub struct RecordReader {
    records: VecDeque<CatalogRecord>,
}

impl RecordReader {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn for_families(families: Vec<Family>) -> Self {
        Self::new(families.into_iter().map(CatalogRecord::Family).collect())
    }
}

#[async_trait]
impl ItemReader for RecordReader {
    async fn read(&mut self) -> Result<Option<CatalogRecord>, ReaderError> {
        Ok(self.records.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_in_order_then_stays_exhausted() {
        let mut reader = RecordReader::for_families(vec![
            Family::new("shoes"),
            Family::new("mugs"),
        ]);
        reader.initialize().await.unwrap();

        let first = reader.read().await.unwrap().unwrap();
        assert!(matches!(first, CatalogRecord::Family(f) if f.code == "shoes".into()));
        assert!(reader.read().await.unwrap().is_some());
        assert!(reader.read().await.unwrap().is_none());
        assert!(reader.read().await.unwrap().is_none());
    }
}
