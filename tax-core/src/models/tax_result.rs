use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a tax calculation for one income and year.
///
/// `per_bracket` is keyed by band label (`"{min}-{upper}"`, two decimals).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxResult {
    pub total_tax: Decimal,
    pub per_bracket: BTreeMap<String, Decimal>,
    pub effective_rate: Decimal,
}

impl TaxResult {
    /// The result for an income of zero: no tax, no bands, zero rate.
    pub fn zero() -> Self {
        Self::default()
    }
}
