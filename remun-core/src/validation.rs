//! Input validation.
//!
//! [`InputValidator::validate`] runs every check and returns all violations
//! together. [`InputValidator::advisories`] reports situations that are legal
//! but worth flagging; they never block a simulation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Rule, ValidationErrors, Violation};
use crate::models::SimulationInput;

/// Legal bounds of the household quotient.
pub const MIN_HOUSEHOLD_SHARES: Decimal = dec!(0.5);
pub const MAX_HOUSEHOLD_SHARES: Decimal = dec!(6.0);

/// Share capital below which an EURL is considered undercapitalised.
pub const RECOMMENDED_EURL_CAPITAL: Decimal = dec!(100);

/// Rough total-cost multiplier used to estimate whether dividends are
/// realistic before running a simulation.
const ESTIMATED_SALARY_COST_FACTOR: Decimal = dec!(1.5);

/// A non-blocking remark about the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// Share capital is below the amount recommended for an EURL.
    LowEurlShareCapital {
        share_capital: Decimal,
        recommended_minimum: Decimal,
    },

    /// Dividends were requested but little or no profit is expected to
    /// remain after salary.
    DividendsUnlikely { estimated_remaining_profit: Decimal },
}

/// Checks simulation inputs against business rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Validates `input`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each offending field and rule.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use remun_core::{DividendTaxation, SimulationInput};
    /// use remun_core::validation::InputValidator;
    ///
    /// let input = SimulationInput {
    ///     annual_revenue: dec!(-1),
    ///     operating_expenses: dec!(0),
    ///     monthly_target_net_salary: dec!(0),
    ///     distribute_dividends: false,
    ///     household_shares: dec!(8),
    ///     dividend_taxation: DividendTaxation::FlatTax,
    ///     share_capital: dec!(0),
    /// };
    ///
    /// let errors = InputValidator::validate(&input).unwrap_err();
    /// assert!(errors.concerns("annual_revenue"));
    /// assert!(errors.concerns("household_shares"));
    /// assert!(errors.concerns("share_capital"));
    /// ```
    pub fn validate(input: &SimulationInput) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        Self::check_monetary_values(input, &mut violations);
        Self::check_household_shares(input, &mut violations);
        Self::check_share_capital(input, &mut violations);
        Self::check_coherence(input, &mut violations);

        ValidationErrors::check(violations)
    }

    fn check_monetary_values(
        input: &SimulationInput,
        violations: &mut Vec<Violation>,
    ) {
        for (field, value) in [
            ("annual_revenue", input.annual_revenue),
            ("operating_expenses", input.operating_expenses),
            ("monthly_target_net_salary", input.monthly_target_net_salary),
        ] {
            if value < Decimal::ZERO {
                violations.push(Violation::new(field, Rule::NonNegative, value));
            }
        }
    }

    fn check_household_shares(
        input: &SimulationInput,
        violations: &mut Vec<Violation>,
    ) {
        let shares = input.household_shares;
        if !(MIN_HOUSEHOLD_SHARES..=MAX_HOUSEHOLD_SHARES).contains(&shares) {
            violations.push(Violation::new(
                "household_shares",
                Rule::WithinRange {
                    min: MIN_HOUSEHOLD_SHARES,
                    max: MAX_HOUSEHOLD_SHARES,
                },
                shares,
            ));
        }
    }

    fn check_share_capital(
        input: &SimulationInput,
        violations: &mut Vec<Violation>,
    ) {
        if input.share_capital <= Decimal::ZERO {
            violations.push(Violation::new(
                "share_capital",
                Rule::StrictlyPositive,
                input.share_capital,
            ));
        }
    }

    /// Cross-field rules. Skipped for fields already reported negative so a
    /// single mistake is not reported twice.
    fn check_coherence(
        input: &SimulationInput,
        violations: &mut Vec<Violation>,
    ) {
        let revenue = input.annual_revenue;
        if revenue < Decimal::ZERO {
            return;
        }

        if input.operating_expenses >= Decimal::ZERO && input.operating_expenses > revenue {
            violations.push(Violation::new(
                "operating_expenses",
                Rule::AtMost {
                    other: "annual_revenue",
                    limit: revenue,
                },
                input.operating_expenses,
            ));
        }

        if input.monthly_target_net_salary < Decimal::ZERO {
            return;
        }
        let within_revenue = input
            .annual_target_net_salary()
            .is_some_and(|annual| annual <= revenue);
        if !within_revenue {
            violations.push(Self::salary_ceiling(input));
        }
    }

    /// Violation for a monthly salary whose twelve payments exceed revenue.
    pub(crate) fn salary_ceiling(input: &SimulationInput) -> Violation {
        Violation::new(
            "monthly_target_net_salary",
            Rule::AtMost {
                other: "annual_revenue / 12",
                limit: input.annual_revenue / Decimal::from(12),
            },
            input.monthly_target_net_salary,
        )
    }

    /// Non-blocking remarks about a valid input. Each one is also logged.
    pub fn advisories(input: &SimulationInput) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        if input.share_capital < RECOMMENDED_EURL_CAPITAL {
            warn!(
                share_capital = %input.share_capital,
                recommended = %RECOMMENDED_EURL_CAPITAL,
                "Share capital below the recommended EURL minimum"
            );
            advisories.push(Advisory::LowEurlShareCapital {
                share_capital: input.share_capital,
                recommended_minimum: RECOMMENDED_EURL_CAPITAL,
            });
        }

        let shortfall = input
            .distribute_dividends
            .then(|| Self::estimated_remaining_profit(input))
            .flatten()
            .filter(|remaining| *remaining < Decimal::ZERO);
        if let Some(estimated_remaining) = shortfall {
            warn!(
                estimated_remaining = %estimated_remaining,
                "Dividends requested but the salary is expected to absorb the profit"
            );
            advisories.push(Advisory::DividendsUnlikely {
                estimated_remaining_profit: estimated_remaining,
            });
        }

        advisories
    }

    /// Profit left after a salary costing `ESTIMATED_SALARY_COST_FACTOR` times
    /// its net; `None` if the estimate overflows.
    fn estimated_remaining_profit(input: &SimulationInput) -> Option<Decimal> {
        let salary_cost = input
            .annual_target_net_salary()?
            .checked_mul(ESTIMATED_SALARY_COST_FACTOR)?;
        input
            .annual_revenue
            .checked_sub(input.operating_expenses)?
            .checked_sub(salary_cost)
    }
}
