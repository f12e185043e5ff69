mod legal_status;
mod rate_table;
mod results;
mod simulation_parameters;
pub(crate) mod tax_bracket;

pub use legal_status::LegalStatus;
pub use rate_table::{RateTable, RateTableConfig, SUPPORTED_YEARS};
pub use results::{
    AppliedDividendTaxation, ComparisonResult, DividendResult, SalaryCost, SimulationResult,
};
pub use simulation_parameters::{
    DEFAULT_SHARE_CAPITAL, DividendTaxation, SimulationInput, SimulationParameters,
};
pub use tax_bracket::TaxBracket;
