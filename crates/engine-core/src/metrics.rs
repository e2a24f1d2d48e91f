use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    products_processed: AtomicU64,
    batches_flushed: AtomicU64,
    jobs_completed: AtomicU64,
    failure_count: AtomicU64,
}

/// Process-wide counters, cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub products_processed: u64,
    pub batches_flushed: u64,
    pub jobs_completed: u64,
    pub failure_count: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_products(&self, count: u64) {
        self.inner
            .products_processed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_batches(&self, count: u64) {
        self.inner
            .batches_flushed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_jobs(&self, count: u64) {
        self.inner.jobs_completed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_failures(&self, count: u64) {
        self.inner.failure_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            products_processed: self.inner.products_processed.load(Ordering::Relaxed),
            batches_flushed: self.inner.batches_flushed.load(Ordering::Relaxed),
            jobs_completed: self.inner.jobs_completed.load(Ordering::Relaxed),
            failure_count: self.inner.failure_count.load(Ordering::Relaxed),
        }
    }
}
