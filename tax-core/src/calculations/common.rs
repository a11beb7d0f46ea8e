//! Common helpers shared by the tax calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Label for a band of income, e.g. `"10000.00-50000.00"`.
///
/// Both ends are rounded half-up and always printed with two decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::band_label;
///
/// assert_eq!(band_label(dec!(0), dec!(5000)), "0.00-5000.00");
/// ```
pub fn band_label(
    lower: Decimal,
    upper: Decimal,
) -> String {
    format!("{:.2}-{:.2}", round_half_up(lower), round_half_up(upper))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(123.45)), dec!(123.45));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // band_label tests
    // =========================================================================

    #[test]
    fn band_label_pads_whole_numbers() {
        assert_eq!(band_label(dec!(10000), dec!(50000)), "10000.00-50000.00");
    }

    #[test]
    fn band_label_rounds_extra_precision() {
        assert_eq!(band_label(dec!(0.005), dec!(1234.5678)), "0.01-1234.57");
    }

    #[test]
    fn band_label_keeps_cents() {
        assert_eq!(band_label(dec!(11925), dec!(48475.5)), "11925.00-48475.50");
    }
}
