//! National income tax, including the reconstruction surtax.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income with the income tax basic deduction |
//! | 2    | Subtract `donation - 2,000` when a donation is given |
//! | 3    | Truncate to 1,000 yen |
//! | 4    | Look up the bracket of the post-donation taxable income |
//! | 5    | `taxable × rate − subtraction`, floored at zero |
//! | 6    | Add `trunc(tax × 2.1%)` reconstruction surtax |
//! | 7    | Truncate to 100 yen |
//!
//! The donation is deducted from income, not from tax, so it goes through
//! the 1,000 yen truncation and can move the income into a lower bracket.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use furusato_core::{IncomeTaxWorksheet, TaxCalculationInput, TaxRules};
//!
//! let rules = TaxRules::default();
//! let worksheet = IncomeTaxWorksheet::new(&rules).unwrap();
//! let input = TaxCalculationInput {
//!     salary_income: dec!(8000000),
//!     social_insurance: dec!(1200000),
//!     ..Default::default()
//! };
//!
//! let result = worksheet.calculate(&input, None);
//!
//! assert_eq!(result.taxable_income, dec!(4420000));
//! assert_eq!(result.income_tax, dec!(466000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    TAX_AMOUNT_UNIT, TAXABLE_INCOME_UNIT, non_negative, truncate_to_unit, truncate_yen,
};
use crate::calculations::{MarginalRate, ProgressiveRateTable, TaxableIncomeResolver};
use crate::{TaxCalculationInput, TaxRules, TaxRulesError};

/// Intermediate and final values of one income tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Taxable income after the donation and the 1,000 yen truncation.
    pub taxable_income: Decimal,

    /// Bracket applied to `taxable_income`.
    pub marginal_rate: MarginalRate,

    /// Tax from the rate table before the surtax.
    pub base_tax: Decimal,

    /// Reconstruction surtax added to `base_tax`.
    pub surtax: Decimal,

    /// Final income tax, truncated to 100 yen.
    pub income_tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxWorksheet<'a> {
    rules: &'a TaxRules,
    resolver: TaxableIncomeResolver<'a>,
    rate_table: ProgressiveRateTable<'a>,
}

impl<'a> IncomeTaxWorksheet<'a> {
    /// Creates a worksheet after validating the rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if the rules fail [`TaxRules::validate`].
    pub fn new(rules: &'a TaxRules) -> Result<Self, TaxRulesError> {
        rules.validate()?;
        Ok(Self {
            rules,
            resolver: TaxableIncomeResolver::new(rules)?,
            rate_table: ProgressiveRateTable::new(&rules.income_tax_brackets)?,
        })
    }

    pub fn resolver(&self) -> &TaxableIncomeResolver<'a> {
        &self.resolver
    }

    /// Taxable income before truncation and without any donation.
    pub fn baseline_taxable_income(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        self.resolver.taxable_income_for_income_tax(input)
    }

    /// Marginal bracket of the no-donation taxable income.
    ///
    /// This is the rate the resident tax special credit and the donation
    /// limit are derived from.
    pub fn baseline_marginal_rate(
        &self,
        input: &TaxCalculationInput,
    ) -> MarginalRate {
        self.rate_table
            .rate_for(self.baseline_taxable_income(input))
    }

    /// Income tax including the reconstruction surtax.
    ///
    /// A donation of `None` or zero computes the baseline.
    pub fn income_tax(
        &self,
        input: &TaxCalculationInput,
        donation: Option<Decimal>,
    ) -> Decimal {
        self.calculate(input, donation).income_tax
    }

    /// Runs every step and returns the intermediate values.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
        donation: Option<Decimal>,
    ) -> IncomeTaxResult {
        let taxable_income =
            self.taxable_income_after_donation(self.baseline_taxable_income(input), donation);

        let marginal_rate = self.rate_table.rate_for(taxable_income);
        let base_tax = self.base_tax(taxable_income, &marginal_rate);
        let surtax = self.surtax(base_tax);
        let income_tax = truncate_to_unit(base_tax + surtax, TAX_AMOUNT_UNIT);

        debug!(
            taxable_income = %taxable_income,
            rate = %marginal_rate.rate,
            base_tax = %base_tax,
            surtax = %surtax,
            income_tax = %income_tax,
            "income tax"
        );

        IncomeTaxResult {
            taxable_income,
            marginal_rate,
            base_tax,
            surtax,
            income_tax,
        }
    }

    /// Steps 2 and 3: the donation deduction then the 1,000 yen truncation.
    fn taxable_income_after_donation(
        &self,
        taxable_income: Decimal,
        donation: Option<Decimal>,
    ) -> Decimal {
        let deductible = match donation {
            Some(amount) if amount > Decimal::ZERO => {
                amount - self.rules.donation_self_burden
            }
            _ => Decimal::ZERO,
        };

        truncate_to_unit(
            non_negative(taxable_income - deductible),
            TAXABLE_INCOME_UNIT,
        )
    }

    fn base_tax(
        &self,
        taxable_income: Decimal,
        marginal_rate: &MarginalRate,
    ) -> Decimal {
        non_negative(truncate_yen(taxable_income * marginal_rate.rate) - marginal_rate.subtraction)
    }

    fn surtax(
        &self,
        base_tax: Decimal,
    ) -> Decimal {
        truncate_yen(base_tax * self.rules.reconstruction_surtax_rate)
    }
}
