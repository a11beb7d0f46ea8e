use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tax_core::{SourceRegistry, TaxCalculator};
use tax_data::CsvSourceFactory;
use tax_http::HttpSourceFactory;
use tracing::info;

use crate::{config::Config, routes};

/// Registry with every bracket source backend this binary ships.
pub fn build_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(Box::new(HttpSourceFactory));
    registry.register(Box::new(CsvSourceFactory));
    registry
}

/// Build the configured bracket source and the calculator on top of it.
pub async fn build_service(config: &Config) -> Result<TaxCalculator> {
    let source_config = config.source_config();
    let source = build_registry()
        .create(&source_config)
        .await
        .with_context(|| format!("failed to create '{}' bracket source", source_config.backend))?;

    let calculator = TaxCalculator::new(Arc::from(source), config.app.supported_years.clone());
    info!(
        backend = %source_config.backend,
        location = %source_config.location,
        years = %calculator.supported_years(),
        "tax calculator ready"
    );

    Ok(calculator)
}

pub async fn build_router(config: &Config) -> Result<Router> {
    let service = build_service(config).await?;
    Ok(routes::router(Arc::new(service), config.request_timeout()))
}
