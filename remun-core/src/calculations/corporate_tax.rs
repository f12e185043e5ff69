//! Two-tier corporate tax (IS).
//!
//! Profit up to the threshold is taxed at the reduced rate, the part above
//! it at the normal rate. A negative base is rejected: clamping a pre-tax
//! loss to zero is the caller's job.

use rust_decimal::Decimal;

use crate::error::{CalculationError, SimulationError};
use crate::models::RateTable;

/// Corporate tax capability.
pub trait CorporateTaxCalculator {
    /// Tax due on `profit`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::NegativeCorporateProfit`] if `profit < 0`.
    fn calculate(
        &self,
        profit: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError>;
}

/// Reduced rate up to the threshold, normal rate beyond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoTierCorporateTax;

impl CorporateTaxCalculator for TwoTierCorporateTax {
    fn calculate(
        &self,
        profit: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        if profit < Decimal::ZERO {
            return Err(CalculationError::NegativeCorporateProfit(profit).into());
        }

        let threshold = rates.corporate_tax_threshold();
        let tax = if profit <= threshold {
            profit * rates.corporate_tax_reduced_rate()
        } else {
            threshold * rates.corporate_tax_reduced_rate()
                + (profit - threshold) * rates.corporate_tax_normal_rate()
        };

        Ok(tax)
    }
}
