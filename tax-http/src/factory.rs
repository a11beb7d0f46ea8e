use async_trait::async_trait;
use tax_core::{BracketSource, SourceConfig, SourceError, SourceFactory};
use tracing::info;

use crate::client::HttpBracketSource;

/// [`SourceFactory`] for the schedule API.
///
/// Register this with a [`tax_core::SourceRegistry`] to make the `"http"`
/// backend available:
///
/// ```rust,no_run
/// use tax_core::SourceRegistry;
/// use tax_http::HttpSourceFactory;
///
/// let mut registry = SourceRegistry::new();
/// registry.register(Box::new(HttpSourceFactory));
/// ```
pub struct HttpSourceFactory;

#[async_trait]
impl SourceFactory for HttpSourceFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// `config.location` is the schedule API base URL, e.g.
    /// `http://localhost:5001`. No request is made until the first fetch.
    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let source = HttpBracketSource::new(&config.location, config.timeout)?;
        info!(base_url = %source.base_url(), timeout = ?config.timeout, "created http bracket source");
        Ok(Box::new(source))
    }
}
