use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxBracket;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("no tax brackets published for year {0}")]
    NotFound(i32),

    #[error("missing or invalid tax brackets for year {0}")]
    EmptySchedule(i32),

    #[error("failed to fetch tax brackets: {0}")]
    Request(String),

    #[error("unexpected response status: {status}. Response body: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("failed to read schedule: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Supplier of bracket schedules, one call per tax year.
///
/// Implementations must return brackets ascending by `min`, non-overlapping,
/// with at most one open-ended band and only in last position. Callers
/// trust this ordering and do not re-check it.
#[async_trait]
pub trait BracketSource: Send + Sync {
    async fn fetch_brackets(
        &self,
        year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError>;
}
