//! Pure fiscal calculators.
//!
//! Each calculator role is a trait with one implementation per rule set, so
//! simulators are assembled by composition rather than by branching on the
//! legal status.

pub mod common;
pub mod corporate_tax;
pub mod income_tax;
pub mod social_charges;

pub use corporate_tax::{CorporateTaxCalculator, TwoTierCorporateTax};
pub use income_tax::{IncomeTaxCalculator, ProgressiveIncomeTax, progressive_tax};
pub use social_charges::{EurlCharges, SasuCharges, SocialChargesCalculator};
