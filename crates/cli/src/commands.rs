use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Load a catalog fixture (attributes, channels, families, products)
    /// into the store through a versioning transaction
    Import {
        #[arg(long, help = "Fixture file path (JSON)")]
        file: String,
    },
    /// Recompute completeness for every product of the given families
    Run {
        #[arg(long, help = "Comma-separated family codes")]
        families: String,

        #[arg(long, help = "Number of products per flush")]
        batch_size: Option<usize>,

        #[arg(long, help = "Job name used in the execution record")]
        job_name: Option<String>,
    },
    /// Report progress of a job execution
    Progress {
        #[arg(long, help = "Job execution ID to inspect")]
        job: String,

        #[arg(
            long,
            help = "If set, prints the progress information as JSON instead of a table"
        )]
        json: bool,
    },
    /// Show stored completeness for one product
    Completeness {
        #[arg(long, help = "Product identifier (SKU)")]
        identifier: String,

        #[arg(long, help = "If set, prints the results as JSON instead of a table")]
        json: bool,
    },
    /// Show version snapshots recorded for a resource
    History {
        #[arg(long, help = "Resource kind: product, family, attribute or channel")]
        kind: String,

        #[arg(long, help = "Resource ID (product identifier or code)")]
        id: String,

        #[arg(long, help = "If set, prints the snapshots as JSON instead of a table")]
        json: bool,
    },
}
