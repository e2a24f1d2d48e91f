use crate::commands::Commands;
use crate::error::CliError;
use crate::fixture::CatalogFixture;
use catalog_store::sled_store::SledCatalogStore;
use clap::Parser;
use engine_core::event_bus::bus::EventBus;
use engine_core::execution::progress::ProgressService;
use engine_core::execution::repository::{JobRepository, SledJobRepository};
use engine_core::metrics::Metrics;
use engine_runtime::config::JobConfig;
use engine_runtime::factory::JobFactory;
use engine_runtime::runner::JobRunner;
use model::core::identifiers::FamilyCode;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};

mod commands;
mod error;
mod fixture;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(name = "plenum", version = "0.1.0", about = "Product completeness engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file } => {
            let json = tokio::fs::read_to_string(&file).await?;
            let fixture = CatalogFixture::parse(&json)?;
            let store = open_catalog_store()?;
            let committed = fixture.import_into(&store)?;
            info!("Imported {committed} changes from {file}");
        }
        Commands::Run {
            families,
            batch_size,
            job_name,
        } => {
            run_job(&families, batch_size, job_name).await?;
        }
        Commands::Progress { job, json } => {
            let repository: Arc<dyn JobRepository> = Arc::new(open_job_repository()?);
            let service = ProgressService::new(repository);
            let report = service
                .report(&job.as_str().into())
                .await?
                .ok_or_else(|| CliError::UnknownJob(job))?;

            if json {
                output::print_json(&report)?;
            } else {
                output::print_progress_table(&report);
            }
        }
        Commands::Completeness { identifier, json } => {
            let store = open_catalog_store()?;
            let product = store
                .product_by_identifier(&identifier.as_str().into())?
                .ok_or_else(|| CliError::UnknownProduct(identifier.clone()))?;

            let results = store.completeness_for_product(&product.key)?;
            let rows: Vec<output::CompletenessRow> =
                results.iter().map(output::CompletenessRow::from).collect();
            if json {
                output::print_json(&rows)?;
            } else {
                output::print_completeness_table(&identifier, &rows);
            }
        }
        Commands::History { kind, id, json } => {
            if !matches!(
                kind.as_str(),
                "product" | "family" | "attribute" | "channel"
            ) {
                return Err(CliError::InvalidResourceKind(kind));
            }
            let store = open_catalog_store()?;
            let versions = store.versions_for(&kind, &id)?;
            if json {
                output::print_json(&versions)?;
            } else {
                output::print_history_table(&kind, &id, &versions);
            }
        }
    }

    Ok(())
}

async fn run_job(
    families: &str,
    batch_size: Option<usize>,
    job_name: Option<String>,
) -> Result<(), CliError> {
    let family_codes: Vec<FamilyCode> = families
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(FamilyCode::from)
        .collect();

    let mut config = JobConfig::new(
        job_name.unwrap_or_else(|| "compute_completeness".to_string()),
        family_codes,
    );
    if let Some(batch_size) = batch_size {
        config = config.with_batch_size(batch_size);
    }

    let store = Arc::new(open_catalog_store()?);
    let repository: Arc<dyn JobRepository> = Arc::new(open_job_repository()?);

    let coordinator = shutdown::ShutdownCoordinator::new(CancellationToken::new());
    coordinator.register_handlers();

    let events = EventBus::new();
    let metrics = Metrics::new();
    let factory = JobFactory::new(
        store,
        repository.clone(),
        events.clone(),
        metrics.clone(),
    );
    let (execution, tasklets) = factory.compute_completeness(&config).await?;
    repository.save(&execution).await?;
    info!(job_id = %execution.id, "Job execution created");

    let runner = JobRunner::new(repository, events, metrics, coordinator.cancel_token());
    let done = runner.run(execution, tasklets).await?;

    output::print_run_summary(&done);
    Ok(())
}

fn state_dir(segment: &str) -> Result<PathBuf, CliError> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Unexpected("Could not determine home directory".into()))?;
    Ok(home.join(".plenum/state").join(segment))
}

fn open_catalog_store() -> Result<SledCatalogStore, CliError> {
    let path = state_dir("catalog")?;
    SledCatalogStore::open(&path).map_err(|err| {
        CliError::Unexpected(format!(
            "Failed to open catalog store at {}: {err}",
            path.display()
        ))
    })
}

fn open_job_repository() -> Result<SledJobRepository, CliError> {
    let path = state_dir("jobs")?;
    SledJobRepository::open(&path).map_err(|err| {
        CliError::Unexpected(format!(
            "Failed to open job repository at {}: {err}",
            path.display()
        ))
    })
}
