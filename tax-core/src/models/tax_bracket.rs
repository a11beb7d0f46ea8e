use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate band of a tax schedule.
///
/// `max` of zero marks the open-ended top band. On the wire a missing `max`
/// means the same thing, and a zero `max` is left out when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    #[serde(default, skip_serializing_if = "Decimal::is_zero")]
    pub max: Decimal,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min: Decimal,
        max: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { min, max, rate }
    }

    /// Upper bound of the band, or `None` for the open-ended top band.
    pub fn upper_bound(&self) -> Option<Decimal> {
        if self.max.is_zero() { None } else { Some(self.max) }
    }

    pub fn is_open_ended(&self) -> bool {
        self.max.is_zero()
    }
}
