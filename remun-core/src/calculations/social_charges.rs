//! Social charges for each legal status.
//!
//! | | SASU | EURL |
//! |---|---|---|
//! | Salary charges | `sasu_salary_charges_rate` × net | `eurl_salary_charges_rate` × net |
//! | Dividend charges | none | `eurl_dividend_charges_rate` × (gross − 10% of capital), if positive |
//!
//! Charge rates are expressed as a share of the net salary, so the total
//! cost of a net salary `n` is `n × (1 + rate)`.

use rust_decimal::Decimal;

use crate::error::{CalculationError, SimulationError};
use crate::models::{LegalStatus, RateTable, SalaryCost};

/// Social-charge capability of one legal status.
///
/// Implementors supply their rates and gross-salary rule; salary costs are
/// derived from [`salary_charges_rate`](Self::salary_charges_rate).
pub trait SocialChargesCalculator {
    fn status(&self) -> LegalStatus;

    /// Charges on salary, as a share of the net salary.
    fn salary_charges_rate(
        &self,
        rates: &RateTable,
    ) -> Decimal;

    /// Approximate gross salary for a net salary and its charges.
    fn gross_salary(
        &self,
        net_salary: Decimal,
        social_charges: Decimal,
        rates: &RateTable,
    ) -> Decimal;

    /// Social charges on `gross_dividends` for a company with
    /// `share_capital`.
    ///
    /// # Errors
    ///
    /// Returns a calculation error for negative dividends or capital.
    fn calculate_dividend_charges(
        &self,
        gross_dividends: Decimal,
        share_capital: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError>;

    /// Cost of paying `target_net_salary`.
    ///
    /// # Errors
    ///
    /// Returns a calculation error for a negative salary.
    fn calculate_salary_cost(
        &self,
        target_net_salary: Decimal,
        rates: &RateTable,
    ) -> Result<SalaryCost, SimulationError> {
        ensure_non_negative("target_net_salary", target_net_salary)?;
        let charges = target_net_salary * self.salary_charges_rate(rates);
        Ok(salary_cost(self, target_net_salary, charges, false, rates))
    }

    /// Largest salary whose total cost is exactly `budget`.
    ///
    /// # Errors
    ///
    /// Returns a calculation error for a negative budget.
    fn salary_cost_within_budget(
        &self,
        budget: Decimal,
        rates: &RateTable,
    ) -> Result<SalaryCost, SimulationError> {
        ensure_non_negative("salary_budget", budget)?;
        let net_salary = budget / (Decimal::ONE + self.salary_charges_rate(rates));
        Ok(salary_cost(self, net_salary, budget - net_salary, true, rates))
    }
}

fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculationError> {
    if value < Decimal::ZERO {
        return Err(CalculationError::NegativeAmount { field, value });
    }
    Ok(())
}

fn salary_cost<C: SocialChargesCalculator + ?Sized>(
    calculator: &C,
    net_salary: Decimal,
    social_charges: Decimal,
    capped_by_profit: bool,
    rates: &RateTable,
) -> SalaryCost {
    let gross_salary = calculator.gross_salary(net_salary, social_charges, rates);
    SalaryCost::new(net_salary, social_charges, capped_by_profit).with_gross_salary(gross_salary)
}

/// SASU president: employee-like charges, none on dividends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SasuCharges;

impl SocialChargesCalculator for SasuCharges {
    fn status(&self) -> LegalStatus {
        LegalStatus::Sasu
    }

    fn salary_charges_rate(
        &self,
        rates: &RateTable,
    ) -> Decimal {
        rates.sasu_salary_charges_rate()
    }

    /// Net plus the employee-side part of the charges.
    fn gross_salary(
        &self,
        net_salary: Decimal,
        social_charges: Decimal,
        rates: &RateTable,
    ) -> Decimal {
        net_salary + social_charges * rates.sasu_employee_charges_share()
    }

    fn calculate_dividend_charges(
        &self,
        gross_dividends: Decimal,
        share_capital: Decimal,
        _rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        ensure_non_negative("gross_dividends", gross_dividends)?;
        ensure_non_negative("share_capital", share_capital)?;
        Ok(Decimal::ZERO)
    }
}

/// EURL manager: self-employed charges, and charges on the dividend
/// portion above a share of the capital.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EurlCharges;

impl EurlCharges {
    /// Dividends that can be paid before charges apply.
    pub fn exempt_dividends(
        &self,
        share_capital: Decimal,
        rates: &RateTable,
    ) -> Decimal {
        share_capital * rates.eurl_dividend_exempt_capital_share()
    }
}

impl SocialChargesCalculator for EurlCharges {
    fn status(&self) -> LegalStatus {
        LegalStatus::Eurl
    }

    fn salary_charges_rate(
        &self,
        rates: &RateTable,
    ) -> Decimal {
        rates.eurl_salary_charges_rate()
    }

    fn gross_salary(
        &self,
        net_salary: Decimal,
        _social_charges: Decimal,
        rates: &RateTable,
    ) -> Decimal {
        net_salary * rates.eurl_gross_salary_factor()
    }

    fn calculate_dividend_charges(
        &self,
        gross_dividends: Decimal,
        share_capital: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        ensure_non_negative("gross_dividends", gross_dividends)?;
        ensure_non_negative("share_capital", share_capital)?;

        let subject = gross_dividends - self.exempt_dividends(share_capital, rates);
        if subject <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(subject * rates.eurl_dividend_charges_rate())
    }
}
