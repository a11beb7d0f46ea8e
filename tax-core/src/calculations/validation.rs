//! Input validation for tax requests.
//!
//! Income and year arrive as raw text from the request boundary. They are
//! parsed here, before any bracket data is requested, so that malformed
//! input and computation never mix.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::TaxError;
use crate::models::SupportedYears;

/// Checks tax years against the configured set of supported years.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    supported_years: SupportedYears,
}

impl Validator {
    pub fn new(supported_years: SupportedYears) -> Self {
        Self { supported_years }
    }

    pub fn supported_years(&self) -> &SupportedYears {
        &self.supported_years
    }

    /// Parses `raw` as a year and checks that it is supported.
    ///
    /// # Errors
    ///
    /// - [`TaxError::MalformedYear`] if `raw` is not an integer
    /// - [`TaxError::UnsupportedYear`] if the year is outside the configured set
    pub fn validate_year(
        &self,
        raw: &str,
    ) -> Result<i32, TaxError> {
        let year: i32 = raw.trim().parse().map_err(|_| {
            warn!(year = raw, "malformed tax year");
            TaxError::MalformedYear(raw.to_string())
        })?;

        if !self.supported_years.contains(year) {
            warn!(
                year,
                supported = %self.supported_years,
                "unsupported tax year"
            );
            return Err(TaxError::UnsupportedYear(year));
        }

        debug!(year, "valid tax year");
        Ok(year)
    }
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
///
/// `Decimal::from_str` alone is more lenient (it skips `_` separators).
fn is_decimal_literal(token: &str) -> bool {
    fn digits(s: &str) -> usize {
        s.bytes().take_while(u8::is_ascii_digit).count()
    }

    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let int_len = digits(mantissa);
    let frac_len = match &mantissa[int_len..] {
        "" => 0,
        rest => match rest.strip_prefix('.') {
            Some(frac) if digits(frac) == frac.len() => frac.len(),
            _ => return false,
        },
    };
    if int_len + frac_len == 0 {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && digits(exp) == exp.len()
        }
    }
}

/// Parses `raw` as a non-negative income.
///
/// Plain decimal notation (`60000`, `60000.50`) and scientific notation
/// (`6e4`) are accepted. Values that do not fit a [`Decimal`] (more than
/// 28 fractional digits after scaling, or magnitudes of `1e29` and up) are
/// rejected as malformed.
///
/// # Errors
///
/// - [`TaxError::MalformedIncome`] if `raw` is not a number
/// - [`TaxError::NegativeIncome`] if the number is below zero
pub fn parse_income(raw: &str) -> Result<Decimal, TaxError> {
    let trimmed = raw.trim();
    let malformed = || {
        warn!(income = raw, "malformed income");
        TaxError::MalformedIncome(raw.to_string())
    };

    if !is_decimal_literal(trimmed) {
        return Err(malformed());
    }
    let income = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| malformed())?;

    if income.is_sign_negative() && !income.is_zero() {
        warn!(%income, "negative income");
        return Err(TaxError::NegativeIncome(income));
    }

    // "-0" parses as a negative zero; report it as plain zero.
    if income.is_zero() {
        return Ok(Decimal::ZERO);
    }

    Ok(income)
}
