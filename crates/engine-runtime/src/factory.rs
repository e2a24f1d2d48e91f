use crate::config::JobConfig;
use crate::error::RuntimeError;
use catalog_store::reader::RecordReader;
use engine_core::event_bus::bus::EventBus;
use engine_core::execution::job::JobExecution;
use engine_core::execution::repository::JobRepository;
use engine_core::execution::step::Tasklet;
use engine_core::metrics::Metrics;
use engine_core::query::ProductQuerySource;
use engine_core::store::{CatalogRead, ResolveProductKeys, SaveCompleteness};
use engine_processing::calculator::CompletenessCalculator;
use engine_processing::tasklet::compute_completeness::{
    ComputeFamilyCompletenessParams, ComputeFamilyCompletenessTasklet, STEP_NAME,
};
use model::core::identifiers::JobId;
use std::sync::Arc;
use tracing::info;

/// Builds runnable jobs over one catalog store. The store serves as query
/// source, key resolver, calculator input, and completeness sink; every
/// collaborator is injected through the constructor.
pub struct JobFactory<S> {
    store: Arc<S>,
    repository: Arc<dyn JobRepository>,
    events: EventBus,
    metrics: Metrics,
}

impl<S> JobFactory<S>
where
    S: CatalogRead + ProductQuerySource + ResolveProductKeys + SaveCompleteness + 'static,
{
    pub fn new(
        store: Arc<S>,
        repository: Arc<dyn JobRepository>,
        events: EventBus,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            repository,
            events,
            metrics,
        }
    }

    /// Assembles a compute-completeness job for the given family set.
    ///
    /// Fails without creating anything when the configuration is invalid
    /// or any family code is unknown to the catalog.
    pub async fn compute_completeness(
        &self,
        config: &JobConfig,
    ) -> Result<(JobExecution, Vec<Box<dyn Tasklet>>), RuntimeError> {
        let violations = config.validate();
        if !violations.is_empty() {
            return Err(RuntimeError::InvalidConfig(violations));
        }

        let mut families = Vec::with_capacity(config.family_codes.len());
        for code in &config.family_codes {
            match self.store.family(code).await? {
                Some(family) => families.push(family),
                None => return Err(RuntimeError::UnknownFamily(code.to_string())),
            }
        }

        let job_id: JobId = uuid::Uuid::new_v4().to_string().into();
        let mut execution = JobExecution::new(job_id.clone(), config.job_name.clone());
        execution.add_step(STEP_NAME);
        info!(
            job_id = %job_id,
            families = families.len(),
            batch_size = config.batch_size,
            "Assembled compute-completeness job"
        );

        let catalog: Arc<dyn CatalogRead> = self.store.clone();
        let calculator = CompletenessCalculator::new(catalog);
        let tasklet = ComputeFamilyCompletenessTasklet::new(ComputeFamilyCompletenessParams {
            job_id,
            family_reader: Box::new(RecordReader::for_families(families)),
            query_source: self.store.clone(),
            resolve_keys: self.store.clone(),
            calculator: Arc::new(calculator),
            save_completenesses: self.store.clone(),
            job_repository: self.repository.clone(),
            events: self.events.clone(),
            metrics: self.metrics.clone(),
            batch_size: config.batch_size,
        });

        Ok((execution, vec![Box::new(tasklet)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::JobRunner;
    use catalog_store::memory::InMemoryCatalogStore;
    use engine_core::execution::job::JobStatus;
    use engine_core::execution::repository::SledJobRepository;
    use model::catalog::attribute::Attribute;
    use model::catalog::channel::Channel;
    use model::catalog::family::{AttributeRequirement, Family};
    use model::catalog::product::{Product, ProductValue};
    use model::core::value::AttributeValue;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    async fn seeded_store(products: usize) -> Arc<InMemoryCatalogStore> {
        let store = Arc::new(InMemoryCatalogStore::new());
        store
            .insert_attribute(Attribute::new("name").localizable())
            .await;
        store
            .insert_channel(Channel::new("ecommerce", vec!["en_US".into()]))
            .await;

        let mut family = Family::new("shoes");
        family.attributes = vec!["name".into()];
        family.requirements.push(AttributeRequirement {
            channel: "ecommerce".into(),
            attributes: vec!["name".into()],
        });
        store.insert_family(family).await;

        for i in 0..products {
            let mut product = Product::new(format!("sku-{i:03}"), Some("shoes".into()));
            product.set_value(ProductValue {
                attribute: "name".into(),
                channel: None,
                locale: Some("en_US".into()),
                data: AttributeValue::Text(format!("Product {i}")),
            });
            store.insert_product(product).await;
        }
        store
    }

    #[tokio::test]
    async fn end_to_end_run_computes_and_persists_completeness() {
        let dir = tempdir().unwrap();
        let store = seeded_store(7).await;
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let factory = JobFactory::new(
            store.clone(),
            repository.clone(),
            EventBus::new(),
            Metrics::new(),
        );

        let config = JobConfig::new("nightly", vec!["shoes".into()]).with_batch_size(3);
        let (execution, tasklets) = factory.compute_completeness(&config).await.unwrap();
        let job_id = execution.id.clone();
        repository.save(&execution).await.unwrap();

        let runner = JobRunner::new(
            repository.clone(),
            EventBus::new(),
            Metrics::new(),
            CancellationToken::new(),
        );
        let done = runner.run(execution, tasklets).await.unwrap();

        assert_eq!(done.status, JobStatus::Done);
        assert_eq!(store.completeness_count().await, 7);

        let stored = repository.load(&job_id).await.unwrap().unwrap();
        let step = stored.step(&STEP_NAME.into()).unwrap();
        assert_eq!(step.processed_items, 7);
        assert_eq!(step.total_items, Some(7));
    }

    #[tokio::test]
    async fn unknown_family_fails_construction() {
        let dir = tempdir().unwrap();
        let store = seeded_store(0).await;
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let factory =
            JobFactory::new(store, repository, EventBus::new(), Metrics::new());

        let config = JobConfig::new("nightly", vec!["ghosts".into()]);
        let err = factory.compute_completeness(&config).await.err().unwrap();
        assert!(matches!(err, RuntimeError::UnknownFamily(code) if code == "ghosts"));
    }

    #[tokio::test]
    async fn invalid_config_fails_with_all_violations() {
        let dir = tempdir().unwrap();
        let store = seeded_store(0).await;
        let repository: Arc<dyn JobRepository> =
            Arc::new(SledJobRepository::open(dir.path()).unwrap());
        let factory =
            JobFactory::new(store, repository, EventBus::new(), Metrics::new());

        let config = JobConfig::new("", vec![]).with_batch_size(0);
        let err = factory.compute_completeness(&config).await.err().unwrap();
        match err {
            RuntimeError::InvalidConfig(violations) => assert_eq!(violations.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
