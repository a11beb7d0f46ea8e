use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::{CsvBracketSource, api};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve tax bracket schedules from a CSV file over HTTP.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2022)
/// - min: The lower bound of the bracket
/// - max: The upper bound (empty for unlimited)
/// - rate: The marginal tax rate as a decimal (e.g., 0.10)
#[derive(Parser, Debug)]
#[command(name = "tax-schedule-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax schedules
    #[arg(short, long)]
    file: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5001)]
    port: u16,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let source = CsvBracketSource::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to load schedules from: {}", args.file.display()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "schedule server listening");

    axum::serve(listener, api::router(Arc::new(source)))
        .await
        .context("Schedule server stopped")?;

    Ok(())
}
