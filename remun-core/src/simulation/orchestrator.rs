//! SASU / EURL comparison.
//!
//! The orchestrator validates the input once, runs both simulators against
//! the same rate table and picks the status that leaves the manager more
//! money. A tie goes to SASU.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::SimulationError;
use crate::models::{
    ComparisonResult, LegalStatus, RateTable, SimulationInput, SimulationParameters,
    SimulationResult,
};
use crate::simulation::simulator::{EurlSimulator, SasuSimulator, Simulator};
use crate::validation::InputValidator;

/// Runs both simulations and builds the verdict.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator<A = SasuSimulator, B = EurlSimulator> {
    sasu: A,
    eurl: B,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Simulator, B: Simulator> Orchestrator<A, B> {
    pub fn with_simulators(
        sasu: A,
        eurl: B,
    ) -> Self {
        Self { sasu, eurl }
    }

    /// Validates `input` and compares both statuses.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] with every violation if the
    /// input is invalid, or the first error raised by either simulation.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use remun_core::{DividendTaxation, LegalStatus, RateTable, SimulationInput};
    /// use remun_core::simulation::Orchestrator;
    ///
    /// let input = SimulationInput {
    ///     annual_revenue: dec!(100000),
    ///     operating_expenses: dec!(10000),
    ///     monthly_target_net_salary: dec!(4000),
    ///     distribute_dividends: true,
    ///     household_shares: dec!(1),
    ///     dividend_taxation: DividendTaxation::FlatTax,
    ///     share_capital: dec!(1000),
    /// };
    ///
    /// let rates = RateTable::for_year(2024).unwrap();
    /// let comparison = Orchestrator::new().compare(&input, &rates).unwrap();
    ///
    /// assert_eq!(comparison.better_status, LegalStatus::Eurl);
    /// assert_eq!(comparison.advantage, dec!(5136.60));
    /// ```
    pub fn compare(
        &self,
        input: &SimulationInput,
        rates: &RateTable,
    ) -> Result<ComparisonResult, SimulationError> {
        let params = SimulationParameters::new(input.clone())?;
        self.compare_validated(&params, rates)
    }

    /// Same as [`compare`](Self::compare) with the rate table of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] if `year` has no rate table.
    pub fn compare_for_year(
        &self,
        input: &SimulationInput,
        year: i32,
    ) -> Result<ComparisonResult, SimulationError> {
        let rates = RateTable::for_year(year)?;
        self.compare(input, &rates)
    }

    /// Compares both statuses for already validated parameters.
    pub fn compare_validated(
        &self,
        params: &SimulationParameters,
        rates: &RateTable,
    ) -> Result<ComparisonResult, SimulationError> {
        let advisories = InputValidator::advisories(params.input());

        let sasu = self.sasu.simulate(params, rates)?;
        let eurl = self.eurl.simulate(params, rates)?;
        let (better_status, advantage) = verdict(&sasu, &eurl);

        info!(
            year = rates.year(),
            sasu_net = %sasu.net_available,
            eurl_net = %eurl.net_available,
            better = %better_status,
            %advantage,
            "Comparison complete"
        );

        Ok(ComparisonResult {
            fiscal_year: rates.year(),
            sasu,
            eurl,
            better_status,
            advantage,
            advisories,
        })
    }
}

/// Better status and its yearly advantage, labelled from the results
/// themselves. SASU wins ties.
fn verdict(
    first: &SimulationResult,
    second: &SimulationResult,
) -> (LegalStatus, Decimal) {
    let (winner, loser) = match second.net_available.cmp(&first.net_available) {
        Ordering::Greater => (second, first),
        Ordering::Less => (first, second),
        Ordering::Equal if second.status == LegalStatus::Sasu => (second, first),
        Ordering::Equal => (first, second),
    };
    (winner.status, winner.net_available - loser.net_available)
}

/// Compares both statuses with the default calculators.
///
/// # Errors
///
/// Propagates the first error raised by either simulation.
pub fn compare_statuses(
    params: &SimulationParameters,
    rates: &RateTable,
) -> Result<ComparisonResult, SimulationError> {
    Orchestrator::new().compare_validated(params, rates)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::ConfigurationError;
    use crate::models::DividendTaxation;
    use crate::validation::Advisory;

    fn standard_input() -> SimulationInput {
        SimulationInput {
            annual_revenue: dec!(100000),
            operating_expenses: dec!(10000),
            monthly_target_net_salary: dec!(4000),
            distribute_dividends: true,
            household_shares: dec!(1.0),
            dividend_taxation: DividendTaxation::FlatTax,
            share_capital: dec!(1000),
        }
    }

    fn rates() -> RateTable {
        RateTable::for_year(2024).unwrap()
    }

    /// Simulator stand-in returning a fixed net available income.
    struct FixedSimulator {
        status: LegalStatus,
        net_available: Decimal,
    }

    impl Simulator for FixedSimulator {
        fn status(&self) -> LegalStatus {
            self.status
        }

        fn simulate(
            &self,
            params: &SimulationParameters,
            rates: &RateTable,
        ) -> Result<SimulationResult, SimulationError> {
            let mut result = SasuSimulator::new().simulate(params, rates)?;
            result.status = self.status;
            result.net_available = self.net_available;
            Ok(result)
        }
    }

    fn fixed(
        sasu: Decimal,
        eurl: Decimal,
    ) -> Orchestrator<FixedSimulator, FixedSimulator> {
        Orchestrator::with_simulators(
            FixedSimulator {
                status: LegalStatus::Sasu,
                net_available: sasu,
            },
            FixedSimulator {
                status: LegalStatus::Eurl,
                net_available: eurl,
            },
        )
    }

    /// Wraps a simulator and remembers which rate table it was given.
    struct RecordingSimulator<S> {
        inner: S,
        seen: RefCell<Vec<*const RateTable>>,
    }

    impl<S> RecordingSimulator<S> {
        fn new(inner: S) -> Self {
            Self {
                inner,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl<S: Simulator> Simulator for RecordingSimulator<S> {
        fn status(&self) -> LegalStatus {
            self.inner.status()
        }

        fn simulate(
            &self,
            params: &SimulationParameters,
            rates: &RateTable,
        ) -> Result<SimulationResult, SimulationError> {
            self.seen.borrow_mut().push(std::ptr::from_ref(rates));
            self.inner.simulate(params, rates)
        }
    }

    // =========================================================================
    // verdict
    // =========================================================================

    #[test]
    fn standard_scenario_favours_eurl() {
        let comparison = Orchestrator::new().compare(&standard_input(), &rates()).unwrap();

        assert_eq!(comparison.fiscal_year, 2024);
        assert_eq!(comparison.sasu.net_available, dec!(43324.57));
        assert_eq!(comparison.eurl.net_available, dec!(48461.17));
        assert_eq!(comparison.better_status, LegalStatus::Eurl);
        assert_eq!(comparison.advantage, dec!(5136.60));
        assert_eq!(comparison.monthly_advantage(), dec!(428.05));
        assert_eq!(comparison.advisories, Vec::new());
    }

    #[test]
    fn tie_goes_to_sasu() {
        let comparison = fixed(dec!(40000), dec!(40000))
            .compare(&standard_input(), &rates())
            .unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Sasu);
        assert_eq!(comparison.advantage, dec!(0));
    }

    #[test]
    fn one_cent_more_is_enough_for_eurl() {
        let comparison = fixed(dec!(40000), dec!(40000.01))
            .compare(&standard_input(), &rates())
            .unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Eurl);
        assert_eq!(comparison.advantage, dec!(0.01));
    }

    #[test]
    fn swapped_simulators_keep_their_own_labels() {
        let orchestrator = Orchestrator::with_simulators(
            FixedSimulator {
                status: LegalStatus::Eurl,
                net_available: dec!(45000),
            },
            FixedSimulator {
                status: LegalStatus::Sasu,
                net_available: dec!(41000),
            },
        );

        let comparison = orchestrator.compare(&standard_input(), &rates()).unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Eurl);
        assert_eq!(comparison.advantage, dec!(4000));
    }

    #[test]
    fn swapped_simulators_still_give_ties_to_sasu() {
        let orchestrator = Orchestrator::with_simulators(
            FixedSimulator {
                status: LegalStatus::Eurl,
                net_available: dec!(40000),
            },
            FixedSimulator {
                status: LegalStatus::Sasu,
                net_available: dec!(40000),
            },
        );

        let comparison = orchestrator.compare(&standard_input(), &rates()).unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Sasu);
        assert_eq!(comparison.advantage, dec!(0));
    }

    #[test]
    fn advantage_is_absolute_when_sasu_wins() {
        let comparison = fixed(dec!(45000), dec!(41000))
            .compare(&standard_input(), &rates())
            .unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Sasu);
        assert_eq!(comparison.advantage, dec!(4000));
    }

    #[test]
    fn result_for_returns_matching_simulation() {
        let comparison = Orchestrator::new().compare(&standard_input(), &rates()).unwrap();

        assert_eq!(comparison.result_for(LegalStatus::Sasu).status, LegalStatus::Sasu);
        assert_eq!(comparison.result_for(LegalStatus::Eurl).status, LegalStatus::Eurl);
    }

    // =========================================================================
    // inputs and configuration
    // =========================================================================

    #[test]
    fn both_simulations_share_one_rate_table() {
        let orchestrator = Orchestrator::with_simulators(
            RecordingSimulator::new(SasuSimulator::new()),
            RecordingSimulator::new(EurlSimulator::new()),
        );
        let rates = rates();

        orchestrator.compare(&standard_input(), &rates).unwrap();

        let expected = vec![std::ptr::from_ref(&rates)];
        assert_eq!(*orchestrator.sasu.seen.borrow(), expected);
        assert_eq!(*orchestrator.eurl.seen.borrow(), expected);
    }

    #[test]
    fn invalid_input_never_reaches_simulators() {
        let orchestrator = Orchestrator::with_simulators(
            RecordingSimulator::new(SasuSimulator::new()),
            RecordingSimulator::new(EurlSimulator::new()),
        );
        let input = SimulationInput {
            annual_revenue: dec!(-1),
            household_shares: dec!(0.25),
            ..standard_input()
        };

        let result = orchestrator.compare(&input, &rates());

        match result {
            Err(SimulationError::Validation(errors)) => {
                assert!(errors.concerns("annual_revenue"));
                assert!(errors.concerns("household_shares"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(orchestrator.sasu.seen.borrow().is_empty());
        assert!(orchestrator.eurl.seen.borrow().is_empty());
    }

    #[test]
    fn compare_for_year_rejects_unknown_year() {
        let result = Orchestrator::new().compare_for_year(&standard_input(), 1999);

        assert_eq!(
            result,
            Err(SimulationError::Configuration(
                ConfigurationError::UnknownFiscalYear {
                    year: 1999,
                    supported: vec![2024],
                }
            ))
        );
    }

    #[test]
    fn compare_for_year_matches_explicit_table() {
        let by_year = Orchestrator::new()
            .compare_for_year(&standard_input(), 2024)
            .unwrap();
        let explicit = Orchestrator::new().compare(&standard_input(), &rates()).unwrap();

        assert_eq!(by_year, explicit);
    }

    #[test]
    fn advisories_are_attached_to_result() {
        let input = SimulationInput {
            share_capital: dec!(50),
            ..standard_input()
        };

        let comparison = Orchestrator::new().compare(&input, &rates()).unwrap();

        assert_eq!(
            comparison.advisories,
            vec![Advisory::LowEurlShareCapital {
                share_capital: dec!(50),
                recommended_minimum: dec!(100),
            }]
        );
    }

    #[test]
    fn compare_statuses_uses_default_simulators() {
        let params = SimulationParameters::new(standard_input()).unwrap();

        let comparison = compare_statuses(&params, &rates()).unwrap();

        assert_eq!(comparison.better_status, LegalStatus::Eurl);
    }
}
