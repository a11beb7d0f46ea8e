//! Marginal bracket accumulation.
//!
//! Walks a schedule once, in ascending order, taxing the slice of income
//! that falls inside each band at that band's rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracket;
//! use tax_core::calculations::BracketAccumulator;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), dec!(10000), dec!(0.1)),
//!     TaxBracket::new(dec!(10000), dec!(50000), dec!(0.2)),
//!     TaxBracket::new(dec!(50000), dec!(0), dec!(0.3)),
//! ];
//!
//! let result = BracketAccumulator::new(&brackets).calculate(dec!(60000));
//!
//! assert_eq!(result.total_tax, dec!(12000));
//! assert_eq!(result.effective_rate, dec!(0.2));
//! assert_eq!(result.per_bracket["50000.00-60000.00"], dec!(3000));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::calculations::common::band_label;
use crate::models::{TaxBracket, TaxResult};

/// Calculator over one year's bracket schedule.
///
/// The schedule must be sorted by `min` ascending, without overlaps, and
/// may end with one open-ended band (`max == 0`). The accumulator trusts
/// this ordering; an unsorted schedule gives an unspecified result.
#[derive(Debug, Clone)]
pub struct BracketAccumulator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketAccumulator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Computes the tax owed on `income`, which must be non-negative.
    ///
    /// Never fails. An empty schedule or zero income yields
    /// [`TaxResult::zero`].
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> TaxResult {
        let mut per_bracket = BTreeMap::new();
        let mut total_tax = Decimal::ZERO;

        for bracket in self.brackets {
            // Income is fully allocated to the bands below this one.
            if income <= bracket.min {
                break;
            }

            let upper = self.band_upper(bracket, income);
            let taxable = (upper - bracket.min).max(Decimal::ZERO);
            let tax = taxable * bracket.rate;

            total_tax += tax;
            per_bracket.insert(band_label(bracket.min, upper), tax);
        }

        TaxResult {
            total_tax,
            per_bracket,
            effective_rate: self.effective_rate(total_tax, income),
        }
    }

    /// Top of the slice of `income` that falls in `bracket`.
    fn band_upper(
        &self,
        bracket: &TaxBracket,
        income: Decimal,
    ) -> Decimal {
        match bracket.upper_bound() {
            Some(max) if income >= max => max,
            _ => income,
        }
    }

    fn effective_rate(
        &self,
        total_tax: Decimal,
        income: Decimal,
    ) -> Decimal {
        if income > Decimal::ZERO {
            total_tax / income
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn three_band_schedule() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), dec!(10000), dec!(0.1)),
            TaxBracket::new(dec!(10000), dec!(50000), dec!(0.2)),
            TaxBracket::new(dec!(50000), dec!(0), dec!(0.3)),
        ]
    }

    fn us_single_2022() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), dec!(10275), dec!(0.10)),
            TaxBracket::new(dec!(10275), dec!(41775), dec!(0.12)),
            TaxBracket::new(dec!(41775), dec!(89075), dec!(0.22)),
            TaxBracket::new(dec!(89075), dec!(170050), dec!(0.24)),
            TaxBracket::new(dec!(170050), dec!(215950), dec!(0.32)),
            TaxBracket::new(dec!(215950), dec!(539900), dec!(0.35)),
            TaxBracket::new(dec!(539900), dec!(0), dec!(0.37)),
        ]
    }

    fn calculate(
        brackets: &[TaxBracket],
        income: Decimal,
    ) -> TaxResult {
        BracketAccumulator::new(brackets).calculate(income)
    }

    // =========================================================================
    // scenario tests
    // =========================================================================

    #[test]
    fn calculate_spans_three_bands() {
        let result = calculate(&three_band_schedule(), dec!(60000));

        assert_eq!(result.total_tax, dec!(12000));
        assert_eq!(result.effective_rate, dec!(0.2));
        assert_eq!(
            result.per_bracket,
            BTreeMap::from([
                ("0.00-10000.00".to_string(), dec!(1000)),
                ("10000.00-50000.00".to_string(), dec!(8000)),
                ("50000.00-60000.00".to_string(), dec!(3000)),
            ])
        );
    }

    #[test]
    fn calculate_partial_single_band() {
        let brackets = vec![TaxBracket::new(dec!(0), dec!(10000), dec!(0.1))];

        let result = calculate(&brackets, dec!(5000));

        assert_eq!(result.total_tax, dec!(500));
        assert_eq!(result.effective_rate, dec!(0.1));
        assert_eq!(
            result.per_bracket,
            BTreeMap::from([("0.00-5000.00".to_string(), dec!(500))])
        );
    }

    #[test]
    fn calculate_real_schedule() {
        let result = calculate(&us_single_2022(), dec!(100000));

        // 1027.50 + 3780.00 + 10406.00 + 2622.00
        assert_eq!(result.total_tax, dec!(17835.50));
        assert_eq!(result.per_bracket.len(), 4);
        assert_eq!(result.per_bracket["89075.00-100000.00"], dec!(2622.00));
    }

    // =========================================================================
    // edge cases
    // =========================================================================

    #[test]
    fn calculate_zero_income_is_zero_result() {
        let result = calculate(&three_band_schedule(), Decimal::ZERO);

        assert_eq!(result, TaxResult::zero());
    }

    #[test]
    fn calculate_empty_schedule_is_zero_result() {
        let result = calculate(&[], dec!(60000));

        assert_eq!(result, TaxResult::zero());
    }

    #[test]
    fn calculate_income_inside_lowest_band_skips_higher_bands() {
        let result = calculate(&three_band_schedule(), dec!(2500));

        assert_eq!(result.total_tax, dec!(250));
        assert_eq!(result.per_bracket.len(), 1);
    }

    #[test]
    fn calculate_income_at_band_max_fills_band_exactly() {
        let result = calculate(&three_band_schedule(), dec!(10000));

        assert_eq!(result.total_tax, dec!(1000));
        assert_eq!(
            result.per_bracket,
            BTreeMap::from([("0.00-10000.00".to_string(), dec!(1000))])
        );
    }

    #[test]
    fn calculate_open_ended_band_absorbs_remainder() {
        let result = calculate(&three_band_schedule(), dec!(1000000));

        assert_eq!(result.per_bracket["50000.00-1000000.00"], dec!(285000));
        assert_eq!(result.total_tax, dec!(294000));
    }

    #[test]
    fn calculate_income_beyond_bounded_schedule_stops_at_last_max() {
        let brackets = vec![
            TaxBracket::new(dec!(0), dec!(10000), dec!(0.1)),
            TaxBracket::new(dec!(10000), dec!(20000), dec!(0.2)),
        ];

        let result = calculate(&brackets, dec!(50000));

        assert_eq!(result.total_tax, dec!(3000));
        assert_eq!(result.effective_rate, dec!(0.06));
    }

    #[test]
    fn calculate_skips_bands_starting_above_zero() {
        let brackets = vec![
            TaxBracket::new(dec!(0), dec!(12000), dec!(0)),
            TaxBracket::new(dec!(12000), dec!(0), dec!(0.2)),
        ];

        let result = calculate(&brackets, dec!(20000));

        assert_eq!(result.total_tax, dec!(1600));
        assert_eq!(result.per_bracket["0.00-12000.00"], dec!(0));
        assert_eq!(result.effective_rate, dec!(0.08));
    }

    #[test]
    fn calculate_fractional_income() {
        let brackets = vec![TaxBracket::new(dec!(0), dec!(0), dec!(0.15))];

        let result = calculate(&brackets, dec!(1234.56));

        assert_eq!(result.total_tax, dec!(185.184));
        assert_eq!(result.per_bracket["0.00-1234.56"], dec!(185.184));
    }

    // =========================================================================
    // properties
    // =========================================================================

    #[test]
    fn calculate_is_deterministic() {
        let brackets = us_single_2022();

        let first = calculate(&brackets, dec!(87654.32));
        let second = calculate(&brackets, dec!(87654.32));

        assert_eq!(first, second);
    }

    #[test]
    fn total_tax_never_decreases_with_income() {
        let brackets = us_single_2022();
        let mut previous = Decimal::ZERO;

        for step in 0..=700 {
            let income = Decimal::from(step * 1000);
            let total = calculate(&brackets, income).total_tax;
            assert!(total >= previous, "tax fell at income {income}");
            previous = total;
        }
    }

    #[test]
    fn band_min_contributes_no_tax() {
        let brackets = us_single_2022();

        for bracket in &brackets {
            let at_min = calculate(&brackets, bracket.min);
            let band_prefix = format!("{:.2}-", bracket.min);
            assert!(
                !at_min.per_bracket.keys().any(|k| k.starts_with(&band_prefix)),
                "band starting at {} was taxed at its own minimum",
                bracket.min
            );
        }
    }

    #[test]
    fn effective_rate_stays_within_zero_and_top_rate() {
        let brackets = us_single_2022();
        let top_rate = brackets.iter().map(|b| b.rate).max().unwrap();

        for income in [dec!(1), dec!(10275), dec!(55555.55), dec!(539900), dec!(10000000)] {
            let rate = calculate(&brackets, income).effective_rate;
            assert!(rate >= Decimal::ZERO);
            assert!(rate <= top_rate, "rate {rate} above top rate at {income}");
        }
    }
}
