pub mod calculations;
pub mod models;

pub use calculations::{
    DonationEffect, DonationEffectCalculator, DonationLimitError, DonationLimitSolver,
    DonationLimits, IncomeTaxResult, IncomeTaxWorksheet, ResidentTaxResult, ResidentTaxWorksheet,
    TaxSummary, TaxSummaryError,
};
pub use models::*;
