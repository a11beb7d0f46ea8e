use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tax_core::{BracketSource, ScheduleResponse, SourceError, TaxBracket};
use tracing::{debug, error, info, warn};

/// Bracket source backed by the schedule API.
///
/// Fetches `GET {base_url}/tax-calculator/tax-year/{year}` and expects a
/// `{"tax_brackets": [...]}` body with at least one bracket.
#[derive(Debug, Clone)]
pub struct HttpBracketSource {
    base_url: Url,
    client: Client,
}

impl HttpBracketSource {
    /// # Errors
    ///
    /// [`SourceError::Configuration`] if `base_url` is not an absolute URL
    /// or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SourceError::Configuration(format!("invalid schedule API url '{base_url}': {e}"))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn schedule_url(
        &self,
        year: i32,
    ) -> String {
        format!(
            "{}/tax-calculator/tax-year/{year}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl BracketSource for HttpBracketSource {
    async fn fetch_brackets(
        &self,
        year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        let url = self.schedule_url(year);
        debug!(%url, "requesting tax schedule");

        let resp = self.client.get(&url).send().await.map_err(|e| {
            error!(%url, error = %e, "schedule request failed");
            SourceError::Request(e.to_string())
        })?;

        let status = resp.status();
        info!(year, %status, "received schedule response");

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(year, %status, %body, "unexpected schedule response status");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(|e| {
            error!(year, error = %e, "failed to read schedule response body");
            SourceError::Request(format!("failed to read response body: {e}"))
        })?;

        let schedule: ScheduleResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(year, error = %e, "failed to decode schedule response body");
            SourceError::Decode(e.to_string())
        })?;

        if schedule.tax_brackets.is_empty() {
            warn!(
                year,
                body = %String::from_utf8_lossy(&body),
                "missing or invalid tax brackets in response"
            );
            return Err(SourceError::EmptySchedule(year));
        }

        info!(year, count = schedule.tax_brackets.len(), "fetched tax brackets");
        Ok(schedule.tax_brackets)
    }
}
