//! Tax calculation modules for the hometown-tax donation engine.
//!
//! The leaf calculators (deductions, taxable income, rate table) are shared
//! by the worksheets, which compute the two taxes, the effect of a donation,
//! and the donation limit.

pub mod common;
pub mod deductions;
pub mod rate_table;
pub mod taxable_income;
pub mod worksheets;

pub use deductions::DeductionCalculator;
pub use rate_table::{MarginalRate, ProgressiveRateTable};
pub use taxable_income::TaxableIncomeResolver;
pub use worksheets::{
    DonationEffect, DonationEffectCalculator, DonationLimitError, DonationLimitSolver,
    DonationLimits, IncomeTaxResult, IncomeTaxWorksheet, ResidentTaxResult, ResidentTaxWorksheet,
    TaxSummary, TaxSummaryError,
};
