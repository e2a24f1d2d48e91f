use crate::error::QueryError;
use crate::query::IdentifierResult;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Lazy, forward-only sequence over a query result set. Consumed
/// destructively: a cursor is iterated once, start to finish, by exactly
/// one pipeline run.
#[async_trait]
pub trait IdentifierCursor: Send {
    /// Total number of items the cursor will yield, known before iteration
    /// so the pipeline can report a progress total. Implementations back
    /// this with an index count or a materialized result list.
    fn count(&self) -> u64;

    async fn next(&mut self) -> Result<Option<IdentifierResult>, QueryError>;
}

/// Cursor over a materialized result list; `count` is exact.
pub struct VecIdentifierCursor {
    total: u64,
    results: VecDeque<IdentifierResult>,
}

impl VecIdentifierCursor {
    pub fn new(results: Vec<IdentifierResult>) -> Self {
        Self {
            total: results.len() as u64,
            results: results.into(),
        }
    }
}

#[async_trait]
impl IdentifierCursor for VecIdentifierCursor {
    fn count(&self) -> u64 {
        self.total
    }

    async fn next(&mut self) -> Result<Option<IdentifierResult>, QueryError> {
        Ok(self.results.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DocumentKind;

    fn result(id: &str) -> IdentifierResult {
        IdentifierResult {
            identifier: id.into(),
            kind: DocumentKind::Product,
        }
    }

    #[tokio::test]
    async fn count_is_stable_while_iterating() {
        let mut cursor = VecIdentifierCursor::new(vec![result("a"), result("b")]);
        assert_eq!(cursor.count(), 2);

        assert_eq!(cursor.next().await.unwrap().unwrap().identifier, "a".into());
        assert_eq!(cursor.count(), 2);
        assert!(cursor.next().await.unwrap().is_some());
        assert!(cursor.next().await.unwrap().is_none());
    }
}
