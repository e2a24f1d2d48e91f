use crate::core::identifiers::ProductIdentifier;

/// A bounded accumulator of product identifiers.
///
/// Filled one identifier at a time by the driver loop, flushed as soon as it
/// reaches capacity, and drained before the next cycle. It never grows past
/// its capacity; that bound is what keeps the working set of one flush fixed.
#[derive(Debug)]
pub struct IdentifierBatch {
    capacity: usize,
    identifiers: Vec<ProductIdentifier>,
}

impl IdentifierBatch {
    /// Capacity must be at least 1.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "batch capacity must be at least 1");
        Self {
            capacity,
            identifiers: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, identifier: ProductIdentifier) {
        debug_assert!(self.identifiers.len() < self.capacity);
        self.identifiers.push(identifier);
    }

    pub fn is_full(&self) -> bool {
        self.identifiers.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes the accumulated identifiers, leaving the batch empty and ready
    /// for the next cycle.
    pub fn drain(&mut self) -> Vec<ProductIdentifier> {
        std::mem::replace(&mut self.identifiers, Vec::with_capacity(self.capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_up_to_capacity() {
        let mut batch = IdentifierBatch::new(2);
        assert!(batch.is_empty());

        batch.push("a".into());
        assert!(!batch.is_full());
        batch.push("b".into());
        assert!(batch.is_full());
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn drain_empties_and_preserves_order() {
        let mut batch = IdentifierBatch::new(3);
        batch.push("a".into());
        batch.push("b".into());

        let taken = batch.drain();
        assert_eq!(taken, vec!["a".into(), "b".into()]);
        assert!(batch.is_empty());
        assert_eq!(batch.capacity(), 3);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_is_rejected() {
        IdentifierBatch::new(0);
    }
}
