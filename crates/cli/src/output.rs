use crate::error::CliError;
use catalog_store::versioning::Version;
use engine_core::execution::job::JobExecution;
use engine_core::execution::progress::ProgressReport;
use model::completeness::result::CompletenessResult;
use serde::Serialize;

pub fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)?;
    println!("{json}");
    Ok(())
}

pub fn print_progress_table(report: &ProgressReport) {
    println!("Progress for job '{}' ({}):", report.job_id, report.job_name);
    println!("-----------------------------");
    println!("{:<16} {:?}", "Status", report.status);
    for step in &report.steps {
        println!("{:<16} {}", "Step", step.step);
        println!("{:<16} {}", "Stage", step.stage);
        let total = step
            .total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!("{:<16} {} / {}", "Processed", step.processed, total);
        if let Some(pct) = step.percentage {
            println!("{:<16} {pct}%", "Complete");
        }
        if let Some(failure) = &step.failure {
            println!("{:<16} {failure}", "Failure");
        }
    }
    println!("{:<16} {}", "Updated", report.updated_at.to_rfc3339());
}

/// Completeness of one (channel, locale) pair, flattened for output.
#[derive(Debug, Serialize)]
pub struct CompletenessRow {
    pub channel: String,
    pub locale: String,
    pub ratio: u8,
    pub required: u32,
    pub missing: Vec<String>,
}

impl From<&CompletenessResult> for CompletenessRow {
    fn from(result: &CompletenessResult) -> Self {
        Self {
            channel: result.channel.to_string(),
            locale: result.locale.to_string(),
            ratio: result.ratio(),
            required: result.required,
            missing: result.missing.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub fn print_completeness_table(identifier: &str, rows: &[CompletenessRow]) {
    println!("Completeness for product '{identifier}':");
    println!("{:<16} {:<8} {:>6}  missing", "channel", "locale", "ratio");
    for row in rows {
        println!(
            "{:<16} {:<8} {:>5}%  {}",
            row.channel,
            row.locale,
            row.ratio,
            if row.missing.is_empty() {
                "-".to_string()
            } else {
                row.missing.join(", ")
            }
        );
    }
}

pub fn print_history_table(kind: &str, id: &str, versions: &[Version]) {
    println!("History for {kind} '{id}':");
    println!("{:<8} {:<8} logged at", "version", "change");
    for version in versions {
        println!(
            "{:<8} {:<8} {}",
            version.version,
            version.change,
            version.logged_at.to_rfc3339()
        );
    }
}

pub fn print_run_summary(execution: &JobExecution) {
    println!("Job '{}' finished: {:?}", execution.id, execution.status);
    for step in &execution.steps {
        let total = step
            .total_items
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<32} {:<10} {} / {} processed",
            step.name, step.stage, step.processed_items, total
        );
    }
}
