//! Personal income tax on the progressive scale with household shares.
//!
//! Income is divided by the number of household shares, the scale is
//! applied to the per-share income, and the result is multiplied back.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use remun_core::RateTable;
//! use remun_core::calculations::{IncomeTaxCalculator, ProgressiveIncomeTax};
//!
//! let rates = RateTable::for_year(2024).unwrap();
//! let tax = ProgressiveIncomeTax.calculate(dec!(50000), dec!(2), &rates).unwrap();
//!
//! // 25 000 per share: (25000 - 11294) x 11% = 1507.66, times two shares.
//! assert_eq!(tax, dec!(3015.32));
//! ```

use rust_decimal::Decimal;

use crate::error::{Rule, SimulationError, ValidationErrors, Violation};
use crate::models::{RateTable, TaxBracket};

/// Applies a progressive scale to `income`.
///
/// Returns zero for `income <= 0`. Each bracket taxes the slice between the
/// previous bracket's ceiling and its own; the last bracket is unbounded.
/// No rounding is applied.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use remun_core::TaxBracket;
/// use remun_core::calculations::progressive_tax;
///
/// let brackets = [
///     TaxBracket::new(dec!(11294), dec!(0.00)).unwrap(),
///     TaxBracket::new(dec!(28797), dec!(0.11)).unwrap(),
///     TaxBracket::unbounded(dec!(0.30)).unwrap(),
/// ];
///
/// assert_eq!(progressive_tax(dec!(10000), &brackets), dec!(0));
/// assert_eq!(progressive_tax(dec!(20000), &brackets), dec!(957.66));
/// ```
pub fn progressive_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let last = brackets.len().saturating_sub(1);
    let mut tax = Decimal::ZERO;
    let mut floor = Decimal::ZERO;

    for (i, bracket) in brackets.iter().enumerate() {
        match ceiling(bracket, i == last) {
            Some(upper) if income > upper => {
                tax += (upper - floor) * bracket.rate();
                floor = upper;
            }
            _ => {
                tax += (income - floor) * bracket.rate();
                break;
            }
        }
    }

    tax
}

/// Rate of the bracket `income` falls in; zero for an empty scale.
pub fn bracket_rate(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    let last = brackets.len().saturating_sub(1);
    brackets
        .iter()
        .enumerate()
        .find(|(i, b)| ceiling(b, *i == last).is_none_or(|upper| income <= upper))
        .map_or(Decimal::ZERO, |(_, b)| b.rate())
}

fn ceiling(
    bracket: &TaxBracket,
    is_last: bool,
) -> Option<Decimal> {
    if is_last { None } else { bracket.upper_bound() }
}

/// Income tax capability.
pub trait IncomeTaxCalculator {
    /// Tax due on `taxable_income` for a household of `shares` shares.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `shares <= 0`.
    fn calculate(
        &self,
        taxable_income: Decimal,
        shares: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError>;

    /// Marginal rate applying to the last euro of `taxable_income`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `shares <= 0`.
    fn marginal_rate(
        &self,
        taxable_income: Decimal,
        shares: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError>;
}

/// French progressive scale with the household quotient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressiveIncomeTax;

impl ProgressiveIncomeTax {
    fn per_share(
        taxable_income: Decimal,
        shares: Decimal,
    ) -> Result<Decimal, SimulationError> {
        if shares <= Decimal::ZERO {
            return Err(ValidationErrors::single(Violation::new(
                "household_shares",
                Rule::StrictlyPositive,
                shares,
            ))
            .into());
        }
        Ok(taxable_income / shares)
    }
}

impl IncomeTaxCalculator for ProgressiveIncomeTax {
    fn calculate(
        &self,
        taxable_income: Decimal,
        shares: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        let per_share = Self::per_share(taxable_income, shares)?;
        Ok(progressive_tax(per_share, rates.income_tax_brackets()) * shares)
    }

    fn marginal_rate(
        &self,
        taxable_income: Decimal,
        shares: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        let per_share = Self::per_share(taxable_income, shares)?;
        Ok(bracket_rate(per_share, rates.income_tax_brackets()))
    }
}
