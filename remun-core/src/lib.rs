//! Remuneration simulation for a single-shareholder French company.
//!
//! Given revenue, expenses and a target salary, the engine simulates a SASU
//! and an EURL side by side and reports which one leaves the manager more
//! money, itemising every levy along the way.

pub mod calculations;
pub mod error;
pub mod models;
pub mod simulation;
pub mod validation;

pub use error::{
    CalculationError, ConfigurationError, Rule, SimulationError, ValidationErrors, Violation,
};
pub use models::*;
pub use simulation::{Orchestrator, compare_statuses};
