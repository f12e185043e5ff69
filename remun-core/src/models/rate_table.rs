//! Fiscal constants for one tax year.
//!
//! A [`RateTable`] is built once from a [`RateTableConfig`] and passed by
//! reference into every calculation. It cannot be modified after
//! construction.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use remun_core::RateTable;
//!
//! let rates = RateTable::for_year(2024).unwrap();
//!
//! assert_eq!(rates.corporate_tax_threshold(), dec!(42500));
//! assert_eq!(rates.income_tax_brackets().len(), 5);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Rule, ValidationErrors, Violation};
use crate::models::TaxBracket;
use crate::models::tax_bracket::check_rate;

/// Fiscal years with a built-in rate table.
pub const SUPPORTED_YEARS: &[i32] = &[2024];

const MIN_YEAR: i32 = 2020;
const MAX_YEAR: i32 = 2030;

/// Gross salary never reaches twice the net.
const MAX_GROSS_SALARY_FACTOR: Decimal = dec!(2);

/// Raw rate values, as supplied by whatever loads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTableConfig {
    pub year: i32,

    /// Personal income tax scale, ascending.
    pub income_tax_brackets: Vec<TaxBracket>,

    /// Corporate tax rate up to [`Self::corporate_tax_threshold`].
    pub corporate_tax_reduced_rate: Decimal,

    /// Corporate tax rate above the threshold.
    pub corporate_tax_normal_rate: Decimal,

    pub corporate_tax_threshold: Decimal,

    /// Single levy on dividends when the flat tax is chosen.
    pub flat_tax_rate: Decimal,

    /// Social levies alone, applied to dividends under the progressive scale.
    pub social_levy_rate: Decimal,

    /// SASU charges expressed as a share of the net salary.
    pub sasu_salary_charges_rate: Decimal,

    /// EURL self-employed charges expressed as a share of the net salary.
    pub eurl_salary_charges_rate: Decimal,

    /// Employee-side share of the SASU charges, added back to the net salary
    /// to approximate the gross salary.
    pub sasu_employee_charges_share: Decimal,

    /// Gross-to-net multiplier for an EURL manager's salary.
    pub eurl_gross_salary_factor: Decimal,

    /// EURL charges on the dividend portion above the exempt capital share.
    pub eurl_dividend_charges_rate: Decimal,

    /// Share of the share capital that EURL dividends may reach charge-free.
    pub eurl_dividend_exempt_capital_share: Decimal,

    /// Allowance on gross dividends before they enter the progressive scale.
    pub dividend_allowance_rate: Decimal,

    /// Professional-expense allowance on net salary.
    pub salary_allowance_rate: Decimal,

    /// Ceiling of the salary allowance.
    pub salary_allowance_cap: Decimal,
}

impl RateTableConfig {
    /// Official 2024 figures (income scale for 2023 revenue, CGI art. 219
    /// and 200 A, average URSSAF charge rates).
    pub fn france_2024() -> Self {
        let brackets = vec![
            TaxBracket::from_parts(Some(dec!(11294)), dec!(0.00)),
            TaxBracket::from_parts(Some(dec!(28797)), dec!(0.11)),
            TaxBracket::from_parts(Some(dec!(82341)), dec!(0.30)),
            TaxBracket::from_parts(Some(dec!(177106)), dec!(0.41)),
            TaxBracket::from_parts(None, dec!(0.45)),
        ];

        Self {
            year: 2024,
            income_tax_brackets: brackets,
            corporate_tax_reduced_rate: dec!(0.15),
            corporate_tax_normal_rate: dec!(0.25),
            corporate_tax_threshold: dec!(42500),
            flat_tax_rate: dec!(0.30),
            social_levy_rate: dec!(0.172),
            sasu_salary_charges_rate: dec!(0.82),
            eurl_salary_charges_rate: dec!(0.45),
            sasu_employee_charges_share: dec!(0.55),
            eurl_gross_salary_factor: dec!(1.31),
            eurl_dividend_charges_rate: dec!(0.45),
            eurl_dividend_exempt_capital_share: dec!(0.10),
            dividend_allowance_rate: dec!(0.40),
            salary_allowance_rate: dec!(0.10),
            salary_allowance_cap: dec!(14171),
        }
    }

    /// Checks every constraint and reports all violations at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            violations.push(Violation::new(
                "year",
                Rule::WithinRange {
                    min: Decimal::from(MIN_YEAR),
                    max: Decimal::from(MAX_YEAR),
                },
                Decimal::from(self.year),
            ));
        }

        let rates = [
            ("corporate_tax_reduced_rate", self.corporate_tax_reduced_rate),
            ("corporate_tax_normal_rate", self.corporate_tax_normal_rate),
            ("flat_tax_rate", self.flat_tax_rate),
            ("social_levy_rate", self.social_levy_rate),
            ("sasu_salary_charges_rate", self.sasu_salary_charges_rate),
            ("eurl_salary_charges_rate", self.eurl_salary_charges_rate),
            ("sasu_employee_charges_share", self.sasu_employee_charges_share),
            ("eurl_dividend_charges_rate", self.eurl_dividend_charges_rate),
            (
                "eurl_dividend_exempt_capital_share",
                self.eurl_dividend_exempt_capital_share,
            ),
            ("dividend_allowance_rate", self.dividend_allowance_rate),
            ("salary_allowance_rate", self.salary_allowance_rate),
        ];
        for (field, rate) in rates {
            check_rate(&mut violations, field, rate);
        }

        for (field, amount) in [
            ("corporate_tax_threshold", self.corporate_tax_threshold),
            ("salary_allowance_cap", self.salary_allowance_cap),
        ] {
            if amount < Decimal::ZERO {
                violations.push(Violation::new(field, Rule::NonNegative, amount));
            }
        }

        let factor = self.eurl_gross_salary_factor;
        if !(Decimal::ONE..=MAX_GROSS_SALARY_FACTOR).contains(&factor) {
            violations.push(Violation::new(
                "eurl_gross_salary_factor",
                Rule::WithinRange {
                    min: Decimal::ONE,
                    max: MAX_GROSS_SALARY_FACTOR,
                },
                factor,
            ));
        }

        self.check_brackets(&mut violations);

        ValidationErrors::check(violations)
    }

    fn check_brackets(
        &self,
        violations: &mut Vec<Violation>,
    ) {
        let brackets = &self.income_tax_brackets;
        if brackets.is_empty() {
            violations.push(Violation::structural(
                "income_tax_brackets",
                Rule::NotEmpty,
            ));
            return;
        }

        let last = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (i, bracket) in brackets.iter().enumerate() {
            let field = format!("income_tax_brackets[{i}]");
            check_rate(violations, &format!("{field}.rate"), bracket.rate());

            match bracket.upper_bound() {
                Some(upper) => {
                    if upper < Decimal::ZERO {
                        violations.push(Violation::new(
                            format!("{field}.upper_bound"),
                            Rule::NonNegative,
                            upper,
                        ));
                    }
                    if previous.is_some_and(|p| upper <= p) {
                        violations.push(Violation::new(
                            format!("{field}.upper_bound"),
                            Rule::AscendingBrackets,
                            upper,
                        ));
                    }
                    previous = Some(upper);
                }
                None if i != last => {
                    violations.push(Violation::structural(field, Rule::BoundedBracket));
                }
                None => {}
            }
        }
    }
}

/// Validated, immutable fiscal constants for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    config: RateTableConfig,
}

impl RateTable {
    /// Validates `config` and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every out-of-range rate, negative
    /// threshold or malformed bracket.
    pub fn new(config: RateTableConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the built-in table for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownFiscalYear`] when no table is
    /// built in for that year.
    pub fn for_year(year: i32) -> Result<Self, ConfigurationError> {
        match year {
            // Covered by `built_in_2024_table_passes_validation`.
            2024 => Ok(Self {
                config: RateTableConfig::france_2024(),
            }),
            _ => Err(ConfigurationError::UnknownFiscalYear {
                year,
                supported: SUPPORTED_YEARS.to_vec(),
            }),
        }
    }

    pub fn year(&self) -> i32 {
        self.config.year
    }

    pub fn income_tax_brackets(&self) -> &[TaxBracket] {
        &self.config.income_tax_brackets
    }

    pub fn corporate_tax_reduced_rate(&self) -> Decimal {
        self.config.corporate_tax_reduced_rate
    }

    pub fn corporate_tax_normal_rate(&self) -> Decimal {
        self.config.corporate_tax_normal_rate
    }

    pub fn corporate_tax_threshold(&self) -> Decimal {
        self.config.corporate_tax_threshold
    }

    pub fn flat_tax_rate(&self) -> Decimal {
        self.config.flat_tax_rate
    }

    pub fn social_levy_rate(&self) -> Decimal {
        self.config.social_levy_rate
    }

    pub fn sasu_salary_charges_rate(&self) -> Decimal {
        self.config.sasu_salary_charges_rate
    }

    pub fn eurl_salary_charges_rate(&self) -> Decimal {
        self.config.eurl_salary_charges_rate
    }

    pub fn sasu_employee_charges_share(&self) -> Decimal {
        self.config.sasu_employee_charges_share
    }

    pub fn eurl_gross_salary_factor(&self) -> Decimal {
        self.config.eurl_gross_salary_factor
    }

    pub fn eurl_dividend_charges_rate(&self) -> Decimal {
        self.config.eurl_dividend_charges_rate
    }

    pub fn eurl_dividend_exempt_capital_share(&self) -> Decimal {
        self.config.eurl_dividend_exempt_capital_share
    }

    pub fn dividend_allowance_rate(&self) -> Decimal {
        self.config.dividend_allowance_rate
    }

    pub fn salary_allowance_rate(&self) -> Decimal {
        self.config.salary_allowance_rate
    }

    pub fn salary_allowance_cap(&self) -> Decimal {
        self.config.salary_allowance_cap
    }

    /// The raw values this table was built from.
    pub fn config(&self) -> &RateTableConfig {
        &self.config
    }
}

impl TryFrom<RateTableConfig> for RateTable {
    type Error = ValidationErrors;

    fn try_from(config: RateTableConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // built-in tables
    // =========================================================================

    #[test]
    fn for_year_returns_2024_table() {
        let rates = RateTable::for_year(2024).unwrap();

        assert_eq!(rates.year(), 2024);
        assert_eq!(rates.corporate_tax_reduced_rate(), dec!(0.15));
        assert_eq!(rates.corporate_tax_normal_rate(), dec!(0.25));
        assert_eq!(rates.corporate_tax_threshold(), dec!(42500));
        assert_eq!(rates.flat_tax_rate(), dec!(0.30));
        assert_eq!(rates.salary_allowance_cap(), dec!(14171));
        assert_eq!(rates.sasu_employee_charges_share(), dec!(0.55));
        assert_eq!(rates.eurl_gross_salary_factor(), dec!(1.31));
    }

    #[test]
    fn built_in_2024_table_passes_validation() {
        assert_eq!(RateTableConfig::france_2024().validate(), Ok(()));
    }

    #[test]
    fn built_in_2024_scale_ends_unbounded() {
        let rates = RateTable::for_year(2024).unwrap();
        let brackets = rates.income_tax_brackets();

        assert_eq!(brackets.len(), 5);
        assert_eq!(brackets[0].upper_bound(), Some(dec!(11294)));
        assert_eq!(brackets[4].upper_bound(), None);
        assert_eq!(brackets[4].rate(), dec!(0.45));
    }

    #[test]
    fn for_year_rejects_unknown_year() {
        let result = RateTable::for_year(2019);

        assert_eq!(
            result,
            Err(ConfigurationError::UnknownFiscalYear {
                year: 2019,
                supported: vec![2024],
            })
        );
    }

    // =========================================================================
    // RateTable::new validation
    // =========================================================================

    #[test]
    fn new_rejects_year_out_of_range() {
        let config = RateTableConfig {
            year: 1990,
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert!(errors.concerns("year"));
    }

    #[test]
    fn new_reports_every_bad_rate() {
        let config = RateTableConfig {
            flat_tax_rate: dec!(1.2),
            sasu_salary_charges_rate: dec!(-0.1),
            corporate_tax_threshold: dec!(-1),
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert_eq!(errors.violations().len(), 3);
        assert!(errors.concerns("flat_tax_rate"));
        assert!(errors.concerns("sasu_salary_charges_rate"));
        assert!(errors.concerns("corporate_tax_threshold"));
    }

    #[test]
    fn new_rejects_gross_salary_factor_below_one() {
        let config = RateTableConfig {
            eurl_gross_salary_factor: dec!(0.9),
            sasu_employee_charges_share: dec!(1.1),
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert_eq!(errors.violations().len(), 2);
        assert!(errors.concerns("eurl_gross_salary_factor"));
        assert!(errors.concerns("sasu_employee_charges_share"));
    }

    #[test]
    fn new_accepts_zero_threshold() {
        let config = RateTableConfig {
            corporate_tax_threshold: dec!(0),
            ..RateTableConfig::france_2024()
        };

        assert!(RateTable::new(config).is_ok());
    }

    #[test]
    fn new_rejects_empty_scale() {
        let config = RateTableConfig {
            income_tax_brackets: Vec::new(),
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert!(errors.concerns("income_tax_brackets"));
    }

    #[test]
    fn new_rejects_unsorted_scale() {
        let config = RateTableConfig {
            income_tax_brackets: vec![
                TaxBracket::new(dec!(28797), dec!(0.11)).unwrap(),
                TaxBracket::new(dec!(11294), dec!(0.00)).unwrap(),
                TaxBracket::unbounded(dec!(0.45)).unwrap(),
            ],
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert!(errors.concerns("income_tax_brackets[1].upper_bound"));
    }

    #[test]
    fn new_rejects_unbounded_bracket_before_last() {
        let config = RateTableConfig {
            income_tax_brackets: vec![
                TaxBracket::unbounded(dec!(0.11)).unwrap(),
                TaxBracket::new(dec!(11294), dec!(0.30)).unwrap(),
            ],
            ..RateTableConfig::france_2024()
        };

        let errors = RateTable::new(config).unwrap_err();

        assert!(errors.concerns("income_tax_brackets[0]"));
    }

    #[test]
    fn try_from_matches_new() {
        let table: Result<RateTable, _> = RateTableConfig::france_2024().try_into();

        assert_eq!(table, Ok(RateTable::for_year(2024).unwrap()));
    }
}
