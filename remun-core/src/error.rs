//! Error taxonomy for the simulation engine.
//!
//! Errors fall into three families:
//!
//! - [`ValidationErrors`]: the caller supplied invalid parameters or rates.
//!   Carries every violated constraint, not only the first one.
//! - [`ConfigurationError`]: external data is missing (unknown fiscal year).
//! - [`CalculationError`]: an internal invariant broke after validation
//!   passed. This is a logic defect.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// The rule a field failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must be zero or greater.
    NonNegative,

    /// Value must be strictly greater than zero.
    StrictlyPositive,

    /// Value must lie in the closed range `[min, max]`.
    WithinRange { min: Decimal, max: Decimal },

    /// Value must not exceed another field.
    AtMost { other: &'static str, limit: Decimal },

    /// Brackets must be sorted by strictly ascending upper bound.
    AscendingBrackets,

    /// Only the last bracket may be unbounded.
    BoundedBracket,

    /// At least one element is required.
    NotEmpty,
}

impl fmt::Display for Rule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NonNegative => write!(f, "must not be negative"),
            Self::StrictlyPositive => write!(f, "must be strictly positive"),
            Self::WithinRange { min, max } => write!(f, "must be between {min} and {max}"),
            Self::AtMost { other, limit } => write!(f, "must not exceed {other} ({limit})"),
            Self::AscendingBrackets => {
                write!(f, "must be sorted by strictly ascending upper bound")
            }
            Self::BoundedBracket => write!(f, "only the last bracket may be unbounded"),
            Self::NotEmpty => write!(f, "must contain at least one element"),
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field.
    pub field: String,

    /// The constraint that was violated.
    pub rule: Rule,

    /// Offending value, when the field is numeric.
    pub value: Option<Decimal>,
}

impl Violation {
    pub fn new(
        field: impl Into<String>,
        rule: Rule,
        value: Decimal,
    ) -> Self {
        Self {
            field: field.into(),
            rule,
            value: Some(value),
        }
    }

    /// A violation that is not tied to a single numeric value.
    pub fn structural(
        field: impl Into<String>,
        rule: Rule,
    ) -> Self {
        Self {
            field: field.into(),
            rule,
            value: None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} {} (got {value})", self.field, self.rule),
            None => write!(f, "{} {}", self.field, self.rule),
        }
    }
}

/// Every constraint violated by one set of inputs.
///
/// Never empty: a constructor that finds no violation returns `Ok` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s): {}", .violations.len(), join(.violations))]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Turns a list of collected violations into a result.
    pub fn check(violations: Vec<Violation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns `true` if any violation concerns `field`.
    pub fn concerns(
        &self,
        field: &str,
    ) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Missing external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no rate table is known for fiscal year {year} (supported: {supported:?})")]
    UnknownFiscalYear { year: i32, supported: Vec<i32> },
}

/// An internal invariant failed after validation had passed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// Corporate tax was asked for a negative base. The simulator clamps
    /// pre-tax losses to zero before calling the calculator.
    #[error("corporate tax base must not be negative, got {0}")]
    NegativeCorporateProfit(Decimal),

    /// A monetary result field came out negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// Two fields that must agree do not.
    #[error("{what}: expected {expected}, got {actual}")]
    Inconsistent {
        what: &'static str,
        expected: Decimal,
        actual: Decimal,
    },
}

/// Top-level error returned by simulators and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}
