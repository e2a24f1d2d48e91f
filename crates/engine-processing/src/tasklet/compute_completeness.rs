use async_trait::async_trait;
use chrono::Utc;
use engine_core::error::TaskletError;
use engine_core::event_bus::bus::EventBus;
use engine_core::execution::job::{StepExecution, StepStage};
use engine_core::execution::repository::JobRepository;
use engine_core::execution::step::Tasklet;
use engine_core::metrics::Metrics;
use engine_core::query::cursor::IdentifierCursor;
use engine_core::query::{DocumentKind, Operator, ProductQueryBuilder, ProductQuerySource, QueryField};
use engine_core::reader::ItemReader;
use engine_core::store::{CalculateCompleteness, ResolveProductKeys, SaveCompleteness};
use model::catalog::record::CatalogRecord;
use model::core::identifiers::{FamilyCode, JobId, ProductKey};
use model::events::job::JobEvent;
use model::records::batch::IdentifierBatch;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const STEP_NAME: &str = "compute_family_completeness";

pub struct ComputeFamilyCompletenessParams {
    pub job_id: JobId,
    pub family_reader: Box<dyn ItemReader>,
    pub query_source: Arc<dyn ProductQuerySource>,
    pub resolve_keys: Arc<dyn ResolveProductKeys>,
    pub calculator: Arc<dyn CalculateCompleteness>,
    pub save_completenesses: Arc<dyn SaveCompleteness>,
    pub job_repository: Arc<dyn JobRepository>,
    pub events: EventBus,
    pub metrics: Metrics,
    pub batch_size: usize,
}

/// Recomputes completeness for every product belonging to a set of updated
/// families.
///
/// Streams product identifiers for the family set and processes them in
/// bounded batches: resolve to keys, calculate, persist, report progress.
/// A batch flush is the unit of both persistence and progress; any failure
/// aborts the run and leaves earlier flushes committed.
pub struct ComputeFamilyCompletenessTasklet {
    job_id: JobId,
    family_reader: Box<dyn ItemReader>,
    query_source: Arc<dyn ProductQuerySource>,
    resolve_keys: Arc<dyn ResolveProductKeys>,
    calculator: Arc<dyn CalculateCompleteness>,
    save_completenesses: Arc<dyn SaveCompleteness>,
    job_repository: Arc<dyn JobRepository>,
    events: EventBus,
    metrics: Metrics,
    batch_size: usize,
}

impl ComputeFamilyCompletenessTasklet {
    pub fn new(params: ComputeFamilyCompletenessParams) -> Self {
        Self {
            job_id: params.job_id,
            family_reader: params.family_reader,
            query_source: params.query_source,
            resolve_keys: params.resolve_keys,
            calculator: params.calculator,
            save_completenesses: params.save_completenesses,
            job_repository: params.job_repository,
            events: params.events,
            metrics: params.metrics,
            batch_size: params.batch_size,
        }
    }

    /// Drains the upstream reader into a family code list. Any non-family
    /// record is a contract violation by the reader and aborts the run.
    async fn extract_family_codes(&mut self) -> Result<Vec<FamilyCode>, TaskletError> {
        let mut codes = Vec::new();
        while let Some(record) = self.family_reader.read().await? {
            match record {
                CatalogRecord::Family(family) => codes.push(family.code),
                other => {
                    return Err(TaskletError::UnexpectedRecord {
                        expected: "family",
                        got: other.kind(),
                    });
                }
            }
        }
        Ok(codes)
    }

    async fn product_identifiers_for_families(
        &self,
        family_codes: &[FamilyCode],
    ) -> Result<Box<dyn IdentifierCursor>, TaskletError> {
        let query = ProductQueryBuilder::new()
            .add_filter(
                QueryField::Family,
                Operator::InList,
                family_codes.iter().map(|c| c.to_string()).collect(),
            )
            .build();
        Ok(self.query_source.execute(&query).await?)
    }

    /// One flush cycle: resolve, calculate, persist, then report progress
    /// and persist the step execution. Counters advance by the batch's
    /// identifier count even when some identifiers no longer resolve.
    async fn flush(
        &self,
        step: &mut StepExecution,
        batch: &mut IdentifierBatch,
    ) -> Result<(), TaskletError> {
        let identifiers = batch.drain();
        let count = identifiers.len() as u64;
        debug!(batch_size = count, "Flushing identifier batch");

        let keys_by_identifier = self
            .resolve_keys
            .from_identifiers(&identifiers)
            .await
            .map_err(TaskletError::Resolve)?;
        let keys: Vec<ProductKey> = identifiers
            .iter()
            .filter_map(|identifier| match keys_by_identifier.get(identifier) {
                Some(key) => Some(*key),
                None => {
                    warn!(identifier = %identifier, "Identifier no longer resolves, skipping");
                    None
                }
            })
            .collect();

        let results = self
            .calculator
            .from_product_keys(&keys)
            .await
            .map_err(TaskletError::Calculate)?;
        self.save_completenesses.save_all(results).await?;
        self.metrics.increment_products(count);
        self.metrics.increment_batches(1);

        step.increment_processed_items(count);
        step.increment_summary_info("process", count as i64);
        self.job_repository
            .update_step_execution(&self.job_id, step)
            .await?;

        self.events
            .publish(JobEvent::BatchFlushed {
                job_id: self.job_id.clone(),
                step: step.name.clone(),
                batch_size: count,
                processed: step.processed_items,
                total: step.total_items,
                timestamp: Utc::now(),
            })
            .await;

        info!(
            batch_size = count,
            processed = step.processed_items,
            "Completeness batch flushed"
        );
        Ok(())
    }
}

#[async_trait]
impl Tasklet for ComputeFamilyCompletenessTasklet {
    fn name(&self) -> &str {
        STEP_NAME
    }

    fn is_trackable(&self) -> bool {
        true
    }

    async fn execute(&mut self, step: &mut StepExecution) -> Result<(), TaskletError> {
        self.family_reader.initialize().await?;

        step.set_stage(StepStage::ExtractingFamilies);
        let family_codes = self.extract_family_codes().await?;
        if family_codes.is_empty() {
            info!("No updated families, nothing to recompute");
            return Ok(());
        }

        step.set_stage(StepStage::Locating);
        let mut cursor = self.product_identifiers_for_families(&family_codes).await?;
        step.set_total_items(cursor.count());
        info!(
            families = family_codes.len(),
            products = cursor.count(),
            "Recomputing completeness"
        );

        step.set_stage(StepStage::Streaming);
        let mut batch = IdentifierBatch::new(self.batch_size);
        while let Some(result) = cursor.next().await? {
            if result.kind != DocumentKind::Product {
                return Err(TaskletError::UnexpectedDocument {
                    expected: DocumentKind::Product.as_str(),
                    got: result.kind.as_str(),
                });
            }

            batch.push(result.identifier);
            if batch.is_full() {
                self.flush(step, &mut batch).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(step, &mut batch).await?;
        }

        Ok(())
    }
}
