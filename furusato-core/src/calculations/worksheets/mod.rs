mod donation_effect;
mod donation_limit;
mod income_tax;
mod resident_tax;
mod summary;

pub use donation_effect::{DonationEffect, DonationEffectCalculator};
pub use donation_limit::{DonationLimitError, DonationLimitSolver, DonationLimits};
pub use income_tax::{IncomeTaxResult, IncomeTaxWorksheet};
pub use resident_tax::{ResidentTaxResult, ResidentTaxWorksheet};
pub use summary::{TaxSummary, TaxSummaryError};
