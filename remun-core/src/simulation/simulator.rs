//! Full simulation for one legal status.
//!
//! A single skeleton, [`StatusSimulator`], is shared by both statuses. What
//! differs between SASU and EURL lives in the social-charges calculator it is
//! composed with.
//!
//! # Steps
//!
//! | Step | Method | Value |
//! |------|--------|-------|
//! | 1 | [`profit_before_salary`](StatusSimulator::profit_before_salary) | revenue − operating expenses |
//! | 2 | [`salary_cost`](StatusSimulator::salary_cost) | net salary and charges, capped to the profit available |
//! | 3 | [`profit_after_salary`](StatusSimulator::profit_after_salary) | step 1 − total salary cost |
//! | 4 | [`corporate_tax`](StatusSimulator::corporate_tax) | corporate tax on step 3, floored at zero |
//! | 5 | [`net_company_result`](StatusSimulator::net_company_result) | step 3 − step 4 |
//! | 6 | [`dividend_result`](StatusSimulator::dividend_result) | charges and tax on the distributed result |
//! | 7 | [`taxable_income`](StatusSimulator::taxable_income), [`income_tax`](StatusSimulator::income_tax) | salary after allowance, plus dividends under the progressive option |
//! | 8 | [`net_available`](StatusSimulator::net_available) | net salary + net dividends − income tax |
//! | 9 | [`global_tax_rate`](StatusSimulator::global_tax_rate) | every levy ÷ revenue |
//!
//! Each monetary step is rounded to cents.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use remun_core::{
//!     DividendTaxation, RateTable, SimulationInput, SimulationParameters,
//!     simulation::{EurlSimulator, Simulator},
//! };
//!
//! let rates = RateTable::for_year(2024).unwrap();
//! let params = SimulationParameters::new(SimulationInput {
//!     annual_revenue: dec!(100000),
//!     operating_expenses: dec!(10000),
//!     monthly_target_net_salary: dec!(4000),
//!     distribute_dividends: true,
//!     household_shares: dec!(1),
//!     dividend_taxation: DividendTaxation::FlatTax,
//!     share_capital: dec!(1000),
//! })
//! .unwrap();
//!
//! let result = EurlSimulator::new().simulate(&params, &rates).unwrap();
//!
//! assert_eq!(result.salary.social_charges, dec!(21600.00));
//! assert_eq!(result.corporate_tax, dec!(3060.00));
//! assert_eq!(result.dividends.social_charges, dec!(7758.00));
//! assert_eq!(result.net_available, dec!(48461.17));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, round_half_up, round_rate};
use crate::calculations::{
    CorporateTaxCalculator, EurlCharges, IncomeTaxCalculator, ProgressiveIncomeTax, SasuCharges,
    SocialChargesCalculator, TwoTierCorporateTax,
};
use crate::error::SimulationError;
use crate::models::{
    AppliedDividendTaxation, DividendResult, DividendTaxation, LegalStatus, RateTable,
    SalaryCost, SimulationParameters, SimulationResult,
};

/// Simulation capability of one legal status.
pub trait Simulator {
    fn status(&self) -> LegalStatus;

    /// Runs every step and returns the itemized result.
    ///
    /// # Errors
    ///
    /// Propagates calculator errors and reports a calculation error if the
    /// assembled result breaks an invariant.
    fn simulate(
        &self,
        params: &SimulationParameters,
        rates: &RateTable,
    ) -> Result<SimulationResult, SimulationError>;
}

/// Shared simulation skeleton, parameterised by its calculators.
#[derive(Debug, Clone, Default)]
pub struct StatusSimulator<S, I = ProgressiveIncomeTax, C = TwoTierCorporateTax> {
    charges: S,
    income_tax: I,
    corporate_tax: C,
}

/// SASU: employee-like salary charges, no charges on dividends.
pub type SasuSimulator = StatusSimulator<SasuCharges>;

/// EURL: self-employed salary charges, charges on dividends above 10% of capital.
pub type EurlSimulator = StatusSimulator<EurlCharges>;

impl<S: Default> StatusSimulator<S> {
    /// Composes `S` with the default income and corporate tax calculators.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, I, C> StatusSimulator<S, I, C> {
    pub fn with_calculators(
        charges: S,
        income_tax: I,
        corporate_tax: C,
    ) -> Self {
        Self {
            charges,
            income_tax,
            corporate_tax,
        }
    }
}

impl<S, I, C> StatusSimulator<S, I, C>
where
    S: SocialChargesCalculator,
    I: IncomeTaxCalculator,
    C: CorporateTaxCalculator,
{
    /// Step 1: revenue minus operating expenses.
    pub fn profit_before_salary(
        &self,
        params: &SimulationParameters,
    ) -> Decimal {
        round_half_up(params.annual_revenue() - params.operating_expenses())
    }

    /// Step 2: cost of the target salary.
    ///
    /// When the company cannot afford the target, the salary is reduced so
    /// its total cost equals the profit available.
    pub fn salary_cost(
        &self,
        params: &SimulationParameters,
        profit_before_salary: Decimal,
        rates: &RateTable,
    ) -> Result<SalaryCost, SimulationError> {
        let target = params.annual_target_net_salary();
        let requested = self.charges.calculate_salary_cost(target, rates)?;
        let budget = non_negative(profit_before_salary);

        if requested.total_cost <= budget {
            return Ok(requested.rounded());
        }

        warn!(
            status = %self.charges.status(),
            target = %target,
            requested_cost = %requested.total_cost,
            budget = %budget,
            "Target salary exceeds available profit; capping salary"
        );
        Ok(self
            .charges
            .salary_cost_within_budget(budget, rates)?
            .rounded())
    }

    /// Step 3: profit left once the salary is paid.
    pub fn profit_after_salary(
        &self,
        profit_before_salary: Decimal,
        salary: &SalaryCost,
    ) -> Decimal {
        profit_before_salary - salary.total_cost
    }

    /// Step 4: corporate tax; a loss is taxed as zero profit.
    pub fn corporate_tax(
        &self,
        profit_after_salary: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        let tax = self
            .corporate_tax
            .calculate(non_negative(profit_after_salary), rates)?;
        Ok(round_half_up(tax))
    }

    /// Step 5: company result after corporate tax.
    pub fn net_company_result(
        &self,
        profit_after_salary: Decimal,
        corporate_tax: Decimal,
    ) -> Decimal {
        profit_after_salary - corporate_tax
    }

    /// Step 6: distributes the whole net company result when requested.
    ///
    /// Dividend charges (EURL) come off first; the flat tax or the social
    /// levies then apply to what is left. Under the progressive option the
    /// same base, less the allowance, is added to the income tax base.
    pub fn dividend_result(
        &self,
        params: &SimulationParameters,
        net_company_result: Decimal,
        rates: &RateTable,
    ) -> Result<DividendResult, SimulationError> {
        if !params.distribute_dividends() || net_company_result <= Decimal::ZERO {
            return Ok(DividendResult::none());
        }

        let gross_amount = net_company_result;
        let social_charges = round_half_up(self.charges.calculate_dividend_charges(
            gross_amount,
            params.share_capital(),
            rates,
        )?);
        let base = gross_amount - social_charges;

        let (tax, taxable_portion, taxation) = match params.dividend_taxation() {
            DividendTaxation::FlatTax => (
                round_half_up(base * rates.flat_tax_rate()),
                Decimal::ZERO,
                AppliedDividendTaxation::FlatTax,
            ),
            DividendTaxation::Progressive => (
                round_half_up(base * rates.social_levy_rate()),
                round_half_up(base * (Decimal::ONE - rates.dividend_allowance_rate())),
                AppliedDividendTaxation::Progressive,
            ),
        };

        Ok(DividendResult {
            gross_amount,
            social_charges,
            tax,
            net_amount: base - tax,
            taxable_portion,
            taxation,
        })
    }

    /// Step 7a: income tax base.
    ///
    /// Net salary less the capped professional-expense allowance, plus the
    /// taxable dividend portion when dividends went through the progressive
    /// scale.
    pub fn taxable_income(
        &self,
        salary: &SalaryCost,
        dividends: &DividendResult,
        rates: &RateTable,
    ) -> Decimal {
        let allowance = (salary.net_salary * rates.salary_allowance_rate())
            .min(rates.salary_allowance_cap());
        let salary_part = salary.net_salary - allowance;

        let dividend_part = match dividends.taxation {
            AppliedDividendTaxation::Progressive => dividends.taxable_portion,
            AppliedDividendTaxation::FlatTax | AppliedDividendTaxation::None => Decimal::ZERO,
        };

        round_half_up(salary_part + dividend_part)
    }

    /// Step 7b: household income tax on `taxable_income`.
    pub fn income_tax(
        &self,
        params: &SimulationParameters,
        taxable_income: Decimal,
        rates: &RateTable,
    ) -> Result<Decimal, SimulationError> {
        let tax = self
            .income_tax
            .calculate(taxable_income, params.household_shares(), rates)?;
        Ok(round_half_up(tax))
    }

    /// Step 8: what the manager keeps.
    pub fn net_available(
        &self,
        salary: &SalaryCost,
        dividends: &DividendResult,
        income_tax: Decimal,
    ) -> Decimal {
        salary.net_salary + dividends.net_amount - income_tax
    }

    /// Step 9: total levies over revenue; zero without revenue.
    pub fn global_tax_rate(
        &self,
        revenue: Decimal,
        total_levies: Decimal,
    ) -> Decimal {
        if revenue <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_rate(total_levies / revenue)
    }
}

impl<S, I, C> Simulator for StatusSimulator<S, I, C>
where
    S: SocialChargesCalculator,
    I: IncomeTaxCalculator,
    C: CorporateTaxCalculator,
{
    fn status(&self) -> LegalStatus {
        self.charges.status()
    }

    fn simulate(
        &self,
        params: &SimulationParameters,
        rates: &RateTable,
    ) -> Result<SimulationResult, SimulationError> {
        let status = self.status();

        let profit_before_salary = self.profit_before_salary(params);
        let salary = self.salary_cost(params, profit_before_salary, rates)?;
        let profit_after_salary = self.profit_after_salary(profit_before_salary, &salary);
        let corporate_tax = self.corporate_tax(profit_after_salary, rates)?;
        let net_company_result = self.net_company_result(profit_after_salary, corporate_tax);
        debug!(
            %status,
            %profit_before_salary,
            net_salary = %salary.net_salary,
            %profit_after_salary,
            %corporate_tax,
            "Company side computed"
        );

        let dividends = self.dividend_result(params, net_company_result, rates)?;
        let taxable_income = self.taxable_income(&salary, &dividends, rates);
        let income_tax = self.income_tax(params, taxable_income, rates)?;
        let marginal_income_tax_rate =
            self.income_tax
                .marginal_rate(taxable_income, params.household_shares(), rates)?;
        let net_available = self.net_available(&salary, &dividends, income_tax);
        debug!(
            %status,
            gross_dividends = %dividends.gross_amount,
            %taxable_income,
            %income_tax,
            %net_available,
            "Personal side computed"
        );

        let mut result = SimulationResult {
            status,
            fiscal_year: rates.year(),
            revenue: params.annual_revenue(),
            operating_expenses: params.operating_expenses(),
            profit_before_salary,
            salary,
            profit_after_salary,
            corporate_tax,
            net_company_result,
            dividends,
            taxable_income,
            income_tax,
            marginal_income_tax_rate,
            net_available,
            global_tax_rate: Decimal::ZERO,
        };
        result.global_tax_rate = self.global_tax_rate(result.revenue, result.total_levies());

        result.check_invariants()?;
        Ok(result)
    }
}
