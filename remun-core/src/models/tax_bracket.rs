use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Rule, ValidationErrors, Violation};

/// One slice of a progressive scale.
///
/// `upper_bound` is the inclusive ceiling of the slice; `None` means the
/// slice is unbounded. The last bracket of a scale is always treated as
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    upper_bound: Option<Decimal>,
    rate: Decimal,
}

impl TaxBracket {
    /// Creates a bounded bracket.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] if the rate is outside `[0, 1]` or the
    /// bound is negative.
    pub fn new(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Result<Self, ValidationErrors> {
        let mut violations = Vec::new();
        if upper_bound < Decimal::ZERO {
            violations.push(Violation::new("upper_bound", Rule::NonNegative, upper_bound));
        }
        check_rate(&mut violations, "rate", rate);
        ValidationErrors::check(violations)?;

        Ok(Self {
            upper_bound: Some(upper_bound),
            rate,
        })
    }

    /// Creates the open-ended top bracket.
    pub fn unbounded(rate: Decimal) -> Result<Self, ValidationErrors> {
        let mut violations = Vec::new();
        check_rate(&mut violations, "rate", rate);
        ValidationErrors::check(violations)?;

        Ok(Self {
            upper_bound: None,
            rate,
        })
    }

    /// Builds a bracket without checks, for built-in scales that
    /// [`RateTableConfig::validate`](crate::models::RateTableConfig::validate)
    /// covers.
    pub(crate) const fn from_parts(
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { upper_bound, rate }
    }

    pub fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Pushes a violation if `rate` is outside `[0, 1]`.
pub(crate) fn check_rate(
    violations: &mut Vec<Violation>,
    field: &str,
    rate: Decimal,
) {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        violations.push(Violation::new(
            field,
            Rule::WithinRange {
                min: Decimal::ZERO,
                max: Decimal::ONE,
            },
            rate,
        ));
    }
}
