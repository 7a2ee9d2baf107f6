// src/services/rates.rs

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount a NUMERIC(15, 2) payslip column can hold.
pub const MAX_AMOUNT: Decimal = dec!(9999999999999.99);

/// Rounds a monetary amount half-up to two decimal places.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One income-tax bracket. `ceiling` is inclusive; `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBracket {
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

/// Allowance, contribution and income-tax rates applied by the payslip calculator.
///
/// Rates are fractions (0.15 means 15%). The defaults are the statutory values;
/// tests build their own table instead of touching shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionRates {
    /// House allowance, on base salary
    pub house_rate: Decimal,
    /// Transport allowance, on base salary
    pub transport_rate: Decimal,
    /// Employee pension contribution, on base salary
    pub pension_rate: Decimal,
    /// Medical insurance, on base salary
    pub medical_rate: Decimal,
    /// Amount of gross salary exempt from income tax
    pub tax_exemption: Decimal,
    /// Ordered by ascending ceiling; the last bracket should be unbounded
    pub tax_brackets: Vec<TaxBracket>,
}

impl Default for DeductionRates {
    fn default() -> Self {
        Self {
            house_rate: dec!(0.15),
            transport_rate: dec!(0.10),
            pension_rate: dec!(0.03),
            medical_rate: dec!(0.075),
            tax_exemption: dec!(30000),
            tax_brackets: vec![
                TaxBracket {
                    ceiling: Some(dec!(100000)),
                    rate: dec!(0.20),
                },
                TaxBracket {
                    ceiling: None,
                    rate: dec!(0.30),
                },
            ],
        }
    }
}

impl DeductionRates {
    /// Income tax on `gross`.
    ///
    /// The whole taxable amount is charged at the rate of the single bracket it falls
    /// into; brackets are not applied marginally.
    pub fn progressive_tax(&self, gross: Decimal) -> Decimal {
        let taxable = round_money(gross - self.tax_exemption);
        if taxable <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let rate = self
            .tax_brackets
            .iter()
            .find(|bracket| bracket.ceiling.is_none_or(|ceiling| taxable <= ceiling))
            .or_else(|| self.tax_brackets.last())
            .map(|bracket| bracket.rate)
            .unwrap_or(Decimal::ZERO);

        round_money(taxable * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_money_is_half_up() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(10.004)), dec!(10.00));
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
    }

    #[test]
    fn no_tax_below_exemption() {
        let rates = DeductionRates::default();
        assert_eq!(rates.progressive_tax(dec!(25000)), Decimal::ZERO);
        assert_eq!(rates.progressive_tax(dec!(30000)), Decimal::ZERO);
    }

    #[test]
    fn lower_bracket_includes_its_ceiling() {
        let rates = DeductionRates::default();
        // taxable = 100000, still 20%
        assert_eq!(rates.progressive_tax(dec!(130000)), dec!(20000));
    }

    #[test]
    fn whole_taxable_amount_uses_the_upper_rate() {
        let rates = DeductionRates::default();
        // taxable = 100000.01, charged entirely at 30%
        assert_eq!(rates.progressive_tax(dec!(130000.01)), dec!(30000.00));
    }

    #[test]
    fn custom_brackets_are_honoured() {
        let rates = DeductionRates {
            tax_exemption: Decimal::ZERO,
            tax_brackets: vec![TaxBracket {
                ceiling: None,
                rate: dec!(0.5),
            }],
            ..DeductionRates::default()
        };
        assert_eq!(rates.progressive_tax(dec!(1000)), dec!(500));
    }
}
