//! Per-status simulation and the SASU / EURL comparison.

pub mod orchestrator;
pub mod simulator;

pub use orchestrator::{Orchestrator, compare_statuses};
pub use simulator::{EurlSimulator, SasuSimulator, Simulator, StatusSimulator};
