use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::validation::InputValidator;

/// Share capital assumed when the caller does not provide one.
pub const DEFAULT_SHARE_CAPITAL: Decimal = dec!(1000);

/// How distributed dividends are taxed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendTaxation {
    /// Single flat levy on the dividend base (PFU).
    #[default]
    FlatTax,
    /// Social levies only, with the remainder folded into the income tax
    /// scale after an allowance.
    Progressive,
}

fn default_share_capital() -> Decimal {
    DEFAULT_SHARE_CAPITAL
}

/// Raw simulation request as supplied by the presentation layer.
///
/// Nothing is checked here; turn it into [`SimulationParameters`] before
/// simulating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Annual revenue excluding VAT.
    pub annual_revenue: Decimal,

    /// Annual operating expenses (rent, equipment, subcontracting).
    pub operating_expenses: Decimal,

    /// Net salary the manager wants to receive each month.
    pub monthly_target_net_salary: Decimal,

    /// Whether the remaining company result is paid out as dividends.
    pub distribute_dividends: bool,

    /// Household tax shares (quotient familial).
    pub household_shares: Decimal,

    #[serde(default)]
    pub dividend_taxation: DividendTaxation,

    /// Share capital; only the EURL dividend rule depends on it.
    #[serde(default = "default_share_capital")]
    pub share_capital: Decimal,
}

impl SimulationInput {
    /// Twelve monthly salaries, or `None` if that overflows.
    pub fn annual_target_net_salary(&self) -> Option<Decimal> {
        self.monthly_target_net_salary.checked_mul(Decimal::from(12))
    }
}

/// A validated, immutable simulation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationParameters {
    input: SimulationInput,
    annual_target_net_salary: Decimal,
}

impl SimulationParameters {
    /// Validates `input` and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated constraint. Values
    /// are never clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use remun_core::{DividendTaxation, SimulationInput, SimulationParameters};
    ///
    /// let params = SimulationParameters::new(SimulationInput {
    ///     annual_revenue: dec!(100000),
    ///     operating_expenses: dec!(10000),
    ///     monthly_target_net_salary: dec!(4000),
    ///     distribute_dividends: true,
    ///     household_shares: dec!(1),
    ///     dividend_taxation: DividendTaxation::FlatTax,
    ///     share_capital: dec!(1000),
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(params.annual_target_net_salary(), dec!(48000));
    /// ```
    pub fn new(input: SimulationInput) -> Result<Self, ValidationErrors> {
        InputValidator::validate(&input)?;
        let annual_target_net_salary = input
            .annual_target_net_salary()
            .ok_or_else(|| ValidationErrors::single(InputValidator::salary_ceiling(&input)))?;

        Ok(Self {
            input,
            annual_target_net_salary,
        })
    }

    pub fn annual_revenue(&self) -> Decimal {
        self.input.annual_revenue
    }

    pub fn operating_expenses(&self) -> Decimal {
        self.input.operating_expenses
    }

    pub fn monthly_target_net_salary(&self) -> Decimal {
        self.input.monthly_target_net_salary
    }

    pub fn annual_target_net_salary(&self) -> Decimal {
        self.annual_target_net_salary
    }

    pub fn distribute_dividends(&self) -> bool {
        self.input.distribute_dividends
    }

    pub fn household_shares(&self) -> Decimal {
        self.input.household_shares
    }

    pub fn dividend_taxation(&self) -> DividendTaxation {
        self.input.dividend_taxation
    }

    pub fn share_capital(&self) -> Decimal {
        self.input.share_capital
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }
}

impl TryFrom<SimulationInput> for SimulationParameters {
    type Error = ValidationErrors;

    fn try_from(input: SimulationInput) -> Result<Self, Self::Error> {
        Self::new(input)
    }
}
