//! Derived result structures.
//!
//! Every value here is produced once by a calculator, simulator or the
//! orchestrator and never changed afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::error::CalculationError;
use crate::models::LegalStatus;
use crate::validation::Advisory;

/// Cost of paying the manager's net salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCost {
    pub net_salary: Decimal,

    /// Employer and employee social charges combined.
    pub social_charges: Decimal,

    /// `net_salary + social_charges`.
    pub total_cost: Decimal,

    /// Approximate payslip gross, set by the status calculator.
    pub gross_salary: Decimal,

    /// The target salary was reduced because the company could not afford it.
    pub capped_by_profit: bool,
}

impl SalaryCost {
    /// Gross salary starts equal to the net; see [`Self::with_gross_salary`].
    pub fn new(
        net_salary: Decimal,
        social_charges: Decimal,
        capped_by_profit: bool,
    ) -> Self {
        Self {
            net_salary,
            social_charges,
            total_cost: net_salary + social_charges,
            gross_salary: net_salary,
            capped_by_profit,
        }
    }

    pub fn with_gross_salary(
        self,
        gross_salary: Decimal,
    ) -> Self {
        Self {
            gross_salary,
            ..self
        }
    }

    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, false)
    }

    /// Rounds to cents while keeping `total = net + charges`.
    ///
    /// The total is rounded first and the charges absorb the difference, so a
    /// capped salary still spends exactly the available budget.
    pub fn rounded(&self) -> Self {
        let total_cost = round_half_up(self.total_cost);
        let net_salary = round_half_up(self.net_salary).min(total_cost);
        Self {
            net_salary,
            social_charges: total_cost - net_salary,
            total_cost,
            gross_salary: round_half_up(self.gross_salary).max(net_salary),
            capped_by_profit: self.capped_by_profit,
        }
    }
}

/// How a dividend amount was taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedDividendTaxation {
    /// Nothing was distributed.
    None,
    FlatTax,
    Progressive,
}

/// Outcome of distributing the company result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendResult {
    pub gross_amount: Decimal,

    /// Social charges on the dividends themselves (EURL only).
    pub social_charges: Decimal,

    /// Flat tax, or social levies alone under the progressive option.
    pub tax: Decimal,

    /// `gross_amount - social_charges - tax`.
    pub net_amount: Decimal,

    /// Portion added to the income tax base (progressive option only).
    pub taxable_portion: Decimal,

    pub taxation: AppliedDividendTaxation,
}

impl DividendResult {
    /// The "no dividends distributed" value.
    pub fn none() -> Self {
        Self {
            gross_amount: Decimal::ZERO,
            social_charges: Decimal::ZERO,
            tax: Decimal::ZERO,
            net_amount: Decimal::ZERO,
            taxable_portion: Decimal::ZERO,
            taxation: AppliedDividendTaxation::None,
        }
    }

    pub fn is_distributed(&self) -> bool {
        self.taxation != AppliedDividendTaxation::None
    }
}

/// Fully itemized simulation for one legal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: LegalStatus,
    pub fiscal_year: i32,
    pub revenue: Decimal,
    pub operating_expenses: Decimal,
    pub profit_before_salary: Decimal,
    pub salary: SalaryCost,
    pub profit_after_salary: Decimal,
    pub corporate_tax: Decimal,
    pub net_company_result: Decimal,
    pub dividends: DividendResult,

    /// Income tax base after the salary allowance.
    pub taxable_income: Decimal,
    pub income_tax: Decimal,

    /// Rate of the income tax bracket the per-share income falls in.
    pub marginal_income_tax_rate: Decimal,

    /// What the manager keeps: net salary plus net dividends minus income tax.
    pub net_available: Decimal,

    /// Every levy divided by revenue, four decimal places.
    pub global_tax_rate: Decimal,
}

impl SimulationResult {
    pub fn monthly_net_available(&self) -> Decimal {
        round_half_up(self.net_available / Decimal::from(12))
    }

    /// Sum of social charges, corporate tax, dividend tax and income tax.
    pub fn total_levies(&self) -> Decimal {
        self.salary.social_charges
            + self.dividends.social_charges
            + self.corporate_tax
            + self.dividends.tax
            + self.income_tax
    }

    /// Re-checks the structural invariants of an assembled result.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] for the first negative amount or broken
    /// identity found. Any error here is a defect, not bad input.
    pub fn check_invariants(&self) -> Result<(), CalculationError> {
        let amounts = [
            ("revenue", self.revenue),
            ("operating_expenses", self.operating_expenses),
            ("profit_before_salary", self.profit_before_salary),
            ("salary.net_salary", self.salary.net_salary),
            ("salary.social_charges", self.salary.social_charges),
            ("salary.total_cost", self.salary.total_cost),
            ("salary.gross_salary", self.salary.gross_salary),
            ("profit_after_salary", self.profit_after_salary),
            ("corporate_tax", self.corporate_tax),
            ("net_company_result", self.net_company_result),
            ("dividends.gross_amount", self.dividends.gross_amount),
            ("dividends.social_charges", self.dividends.social_charges),
            ("dividends.tax", self.dividends.tax),
            ("dividends.net_amount", self.dividends.net_amount),
            ("dividends.taxable_portion", self.dividends.taxable_portion),
            ("taxable_income", self.taxable_income),
            ("income_tax", self.income_tax),
            ("net_available", self.net_available),
            ("global_tax_rate", self.global_tax_rate),
        ];
        if let Some((field, value)) = amounts.into_iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(CalculationError::NegativeAmount { field, value });
        }

        let salary = &self.salary;
        if salary.total_cost != salary.net_salary + salary.social_charges {
            return Err(CalculationError::Inconsistent {
                what: "salary total cost",
                expected: salary.net_salary + salary.social_charges,
                actual: salary.total_cost,
            });
        }

        if salary.gross_salary < salary.net_salary {
            return Err(CalculationError::Inconsistent {
                what: "gross salary below net salary",
                expected: salary.net_salary,
                actual: salary.gross_salary,
            });
        }

        let dividends = &self.dividends;
        let expected_net = dividends.gross_amount - dividends.social_charges - dividends.tax;
        if dividends.net_amount != expected_net {
            return Err(CalculationError::Inconsistent {
                what: "net dividends",
                expected: expected_net,
                actual: dividends.net_amount,
            });
        }

        Ok(())
    }
}

/// Both simulations side by side with the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub fiscal_year: i32,
    pub sasu: SimulationResult,
    pub eurl: SimulationResult,

    /// Status with the larger net available income. Ties go to SASU.
    pub better_status: LegalStatus,

    /// How much more the better status leaves per year.
    pub advantage: Decimal,

    /// Non-blocking remarks about the input.
    pub advisories: Vec<Advisory>,
}

impl ComparisonResult {
    pub fn monthly_advantage(&self) -> Decimal {
        round_half_up(self.advantage / Decimal::from(12))
    }

    pub fn result_for(
        &self,
        status: LegalStatus,
    ) -> &SimulationResult {
        match status {
            LegalStatus::Sasu => &self.sasu,
            LegalStatus::Eurl => &self.eurl,
        }
    }
}
