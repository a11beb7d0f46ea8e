//! Request-level tax calculation.
//!
//! A request moves through
//! `Received → YearValidated → IncomeValidated → BracketsObtained → Computed`.
//! Any validation failure ends it as a rejection before brackets are
//! fetched; a fetch failure ends it as [`TaxError::UpstreamFetchFailure`].
//! Nothing is retried and no partial result is ever returned.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::calculations::{BracketAccumulator, Validator, parse_income};
use crate::error::TaxError;
use crate::models::{SupportedYears, TaxResult};
use crate::source::BracketSource;

#[async_trait]
pub trait TaxService: Send + Sync {
    /// Calculates the tax owed on `income` in `year`, both given as raw text.
    async fn calculate_tax(
        &self,
        income: &str,
        year: &str,
    ) -> Result<TaxResult, TaxError>;

    /// Checks that `year` is an integer and a supported tax year.
    fn validate_tax_year(
        &self,
        year: &str,
    ) -> Result<i32, TaxError>;
}

/// [`TaxService`] backed by a [`BracketSource`].
pub struct TaxCalculator {
    source: Arc<dyn BracketSource>,
    validator: Validator,
}

impl TaxCalculator {
    pub fn new(
        source: Arc<dyn BracketSource>,
        supported_years: SupportedYears,
    ) -> Self {
        Self {
            source,
            validator: Validator::new(supported_years),
        }
    }

    pub fn supported_years(&self) -> &SupportedYears {
        self.validator.supported_years()
    }
}

#[async_trait]
impl TaxService for TaxCalculator {
    async fn calculate_tax(
        &self,
        income: &str,
        year: &str,
    ) -> Result<TaxResult, TaxError> {
        let year = self.validate_tax_year(year)?;
        let income = parse_income(income)?;

        if income.is_zero() {
            debug!(year, "zero income, skipping bracket fetch");
            return Ok(TaxResult::zero());
        }

        let brackets = self.source.fetch_brackets(year).await.map_err(|e| {
            error!(year, error = %e, "failed to fetch tax brackets");
            TaxError::UpstreamFetchFailure(e)
        })?;
        debug!(year, count = brackets.len(), "fetched tax brackets");

        let result = BracketAccumulator::new(&brackets).calculate(income);

        info!(
            year,
            %income,
            total_tax = %result.total_tax,
            effective_rate = %result.effective_rate,
            "calculated tax"
        );
        Ok(result)
    }

    fn validate_tax_year(
        &self,
        year: &str,
    ) -> Result<i32, TaxError> {
        self.validator.validate_year(year)
    }
}
