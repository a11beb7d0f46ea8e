use rust_decimal::Decimal;
use thiserror::Error;

use crate::source::SourceError;

/// Every way a tax request can end without a result.
///
/// The first four variants are input rejections, detected before any
/// bracket fetch. `UpstreamFetchFailure` wraps the source error untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid income: {0:?} is not a number")]
    MalformedIncome(String),

    #[error("invalid income: {0} is negative")]
    NegativeIncome(Decimal),

    #[error("invalid tax year: {0:?} is not an integer")]
    MalformedYear(String),

    #[error("tax year {0} is not supported")]
    UnsupportedYear(i32),

    #[error(transparent)]
    UpstreamFetchFailure(#[from] SourceError),
}

impl TaxError {
    /// True for input rejections, false for upstream failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::UpstreamFetchFailure(_))
    }
}
