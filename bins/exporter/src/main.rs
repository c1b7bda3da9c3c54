//! Escala report exporter
//!
//! Renders one schedule report and writes it to a directory or to the
//! configured object storage.
//!
//! Usage:
//!   escala-export <schedule-id> [--out DIR] [--store] [--locale en|pt-br]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use escala_client::ApiClient;
use escala_core::export::{ExportError, ExportService};
use escala_core::reports::ReportError;
use escala_core::storage::StorageService;
use escala_shared::types::ScheduleId;
use escala_shared::{AppConfig, Locale};

/// Exit status when the schedule has nothing to export.
const NOTHING_TO_EXPORT: u8 = 2;

#[derive(Parser)]
#[command(name = "escala-export")]
#[command(about = "Export a monthly preaching schedule as a PDF report")]
#[command(version)]
struct Args {
    /// Schedule identifier
    schedule_id: ScheduleId,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Write to the configured object storage instead of a directory
    #[arg(long)]
    store: bool,

    /// Label language (overrides configuration)
    #[arg(long)]
    locale: Option<Locale>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "escala_export=info,escala_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ExportError::Report(ReportError::NoData(id))) =
                err.downcast_ref::<ExportError>()
            {
                warn!(schedule_id = %id, "Nothing to export");
                eprintln!("Nothing to export for schedule {id}");
                return ExitCode::from(NOTHING_TO_EXPORT);
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(locale) = args.locale {
        config.report.locale = locale;
    }

    let client = ApiClient::new(&config.api).context("Failed to build schedule API client")?;
    let export = ExportService::new(Arc::new(client), config.report.clone());

    if args.store {
        let Some(storage_config) = config.storage.clone() else {
            bail!("--store requires a storage section in the configuration");
        };
        let storage = StorageService::from_config(storage_config)
            .context("Failed to initialize report storage")?;

        let outcome = export.export(args.schedule_id, &storage).await?;
        println!("{}", outcome.stored.storage_key);
        if let Some(download) = outcome.stored.download {
            println!("{}", download.url);
        }
        return Ok(());
    }

    let report = export.render(args.schedule_id).await?;
    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let path = args.out.join(&report.rendered.filename);
    tokio::fs::write(&path, &report.rendered.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), pages = report.page_count, "Report written");
    println!("{}", path.display());
    Ok(())
}
