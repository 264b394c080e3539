use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::DeductionCalculator;
use crate::calculations::common::non_negative;
use crate::{TaxCalculationInput, TaxRules, TaxRulesError};

/// Combines total income and deductions into a taxable income.
///
/// The basic deduction is a parameter because the income tax and the
/// resident tax use different amounts; everything else is shared.
#[derive(Debug, Clone, Copy)]
pub struct TaxableIncomeResolver<'a> {
    rules: &'a TaxRules,
    deductions: DeductionCalculator<'a>,
}

impl<'a> TaxableIncomeResolver<'a> {
    pub fn new(rules: &'a TaxRules) -> Result<Self, TaxRulesError> {
        Ok(Self {
            rules,
            deductions: DeductionCalculator::new(rules)?,
        })
    }

    pub fn deductions(&self) -> &DeductionCalculator<'a> {
        &self.deductions
    }

    /// Taxable income before any unit truncation, floored at zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{TaxCalculationInput, TaxRules};
    /// use furusato_core::calculations::TaxableIncomeResolver;
    ///
    /// let rules = TaxRules::default();
    /// let resolver = TaxableIncomeResolver::new(&rules).unwrap();
    /// let input = TaxCalculationInput {
    ///     salary_income: dec!(3000000),
    ///     ..Default::default()
    /// };
    ///
    /// // 3,000,000 - 980,000 - 480,000
    /// assert_eq!(resolver.taxable_income(&input, dec!(480000)), dec!(1540000));
    /// ```
    pub fn taxable_income(
        &self,
        input: &TaxCalculationInput,
        basic_deduction: Decimal,
    ) -> Decimal {
        let total_income = self.deductions.total_income(input);
        let deductions = self.deductions.deductions_before_basic(input);
        let taxable = non_negative(total_income - deductions - basic_deduction);

        debug!(
            total_income = %total_income,
            deductions = %deductions,
            basic_deduction = %basic_deduction,
            taxable = %taxable,
            "taxable income"
        );

        taxable
    }

    pub fn taxable_income_for_income_tax(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        self.taxable_income(input, self.rules.income_tax_basic_deduction)
    }

    pub fn taxable_income_for_resident_tax(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        self.taxable_income(input, self.rules.resident_tax_basic_deduction)
    }
}
