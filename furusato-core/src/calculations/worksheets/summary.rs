//! End-to-end evaluation of one taxpayer: both taxes, the donation limit,
//! and what donating exactly the limit saves.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::{
    DonationEffect, DonationEffectCalculator, DonationLimitError, DonationLimitSolver,
    DonationLimits, IncomeTaxWorksheet, ResidentTaxWorksheet,
};
use crate::{InputValidationError, TaxCalculationInput, TaxRules, TaxRulesError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxSummaryError {
    #[error(transparent)]
    Rules(#[from] TaxRulesError),

    #[error("invalid taxpayer input: {0}")]
    Input(#[from] InputValidationError),

    #[error(transparent)]
    DonationLimit(#[from] DonationLimitError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Before the 1,000 yen truncation.
    pub taxable_income_for_income_tax: Decimal,
    pub income_tax: Decimal,
    /// Before the 1,000 yen truncation.
    pub taxable_income_for_resident_tax: Decimal,
    pub resident_tax: Decimal,
    pub limits: DonationLimits,
    /// Savings from donating `limits.special_credit`.
    pub effect_at_limit: DonationEffect,
}

impl TaxSummary {
    /// Validates the input and runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Fails on invalid rules, a negative or fractional input amount, or a
    /// rule set with no positive shelter rate.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{TaxCalculationInput, TaxRules, TaxSummary};
    ///
    /// let input = TaxCalculationInput {
    ///     salary_income: dec!(8000000),
    ///     social_insurance: dec!(1200000),
    ///     ..Default::default()
    /// };
    ///
    /// let summary = TaxSummary::calculate(&TaxRules::default(), &input).unwrap();
    ///
    /// assert_eq!(summary.income_tax, dec!(466000));
    /// assert_eq!(summary.resident_tax, dec!(445600));
    /// assert_eq!(summary.donation_limit(), dec!(130128));
    /// ```
    pub fn calculate(
        rules: &TaxRules,
        input: &TaxCalculationInput,
    ) -> Result<Self, TaxSummaryError> {
        input.validate()?;

        let income_tax = IncomeTaxWorksheet::new(rules)?;
        let resident_tax = ResidentTaxWorksheet::new(rules)?;
        let solver = DonationLimitSolver::new(rules)?;
        let effects = DonationEffectCalculator::new(rules)?;

        let resolver = income_tax.resolver();
        let taxable_income_for_income_tax = resolver.taxable_income_for_income_tax(input);
        let taxable_income_for_resident_tax = resolver.taxable_income_for_resident_tax(input);

        let limits = solver.donation_limits(input)?;
        let effect_at_limit = effects.effect(input, limits.special_credit);

        let summary = Self {
            taxable_income_for_income_tax,
            income_tax: income_tax.income_tax(input, None),
            taxable_income_for_resident_tax,
            resident_tax: resident_tax.resident_tax(input, None, true),
            limits,
            effect_at_limit,
        };

        debug!(
            income_tax = %summary.income_tax,
            resident_tax = %summary.resident_tax,
            limit = %summary.donation_limit(),
            "tax summary"
        );

        Ok(summary)
    }

    /// The special-credit donation limit.
    pub fn donation_limit(&self) -> Decimal {
        self.limits.special_credit
    }
}

impl fmt::Display for TaxSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "Taxable income (income tax):   {}",
            self.taxable_income_for_income_tax
        )?;
        writeln!(f, "Income tax:                    {}", self.income_tax)?;
        writeln!(
            f,
            "Taxable income (resident tax): {}",
            self.taxable_income_for_resident_tax
        )?;
        writeln!(f, "Resident tax:                  {}", self.resident_tax)?;
        writeln!(
            f,
            "Donation limit:                {}",
            self.limits.special_credit
        )?;
        writeln!(
            f,
            "Income tax saving:             {}",
            self.effect_at_limit.income_tax_saving
        )?;
        writeln!(
            f,
            "Resident tax saving:           {}",
            self.effect_at_limit.resident_tax_saving
        )?;
        writeln!(
            f,
            "Out of pocket:                 {}",
            self.effect_at_limit.out_of_pocket
        )?;
        writeln!(
            f,
            "Income tax cap (40%):          {}",
            self.limits.income_tax_cap
        )?;
        write!(
            f,
            "Resident basic cap (30%):      {}",
            self.limits.resident_basic_cap
        )?;
        if self.limits.crosses_bracket {
            write!(
                f,
                "\nNote: the limit lowers the income tax bracket and is approximate"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::DeclarationMethod;

    fn worked_example() -> TaxCalculationInput {
        TaxCalculationInput {
            salary_income: dec!(5000000),
            miscellaneous_income: dec!(100000),
            business_income: dec!(500000),
            medical_expenses: dec!(150000),
            social_insurance: dec!(600000),
            dependent_count: 1,
            spouse_deduction: true,
            declaration_method: DeclarationMethod::Electronic,
        }
    }

    #[test]
    fn worked_example_summary() {
        let summary = TaxSummary::calculate(&TaxRules::default(), &worked_example()).unwrap();

        assert_eq!(summary.taxable_income_for_income_tax, dec!(1770000));
        assert_eq!(summary.income_tax, dec!(90300));
        assert_eq!(summary.taxable_income_for_resident_tax, dec!(1820000));
        assert_eq!(summary.resident_tax, dec!(179900));
        assert_eq!(summary.donation_limit(), dec!(44394));
        assert_eq!(summary.effect_at_limit.income_tax_saving, dec!(2200));
        assert_eq!(summary.effect_at_limit.resident_tax_saving, dec!(40200));
        assert_eq!(summary.effect_at_limit.out_of_pocket, dec!(1994));
    }

    #[test]
    fn all_zero_input() {
        let summary =
            TaxSummary::calculate(&TaxRules::default(), &TaxCalculationInput::default()).unwrap();

        assert_eq!(summary.taxable_income_for_income_tax, dec!(0));
        assert_eq!(summary.income_tax, dec!(0));
        assert_eq!(summary.resident_tax, dec!(0));
        assert_eq!(summary.donation_limit(), dec!(2000));
    }

    #[test]
    fn rejects_negative_input() {
        let input = TaxCalculationInput {
            salary_income: dec!(-1),
            ..Default::default()
        };

        assert_eq!(
            TaxSummary::calculate(&TaxRules::default(), &input),
            Err(TaxSummaryError::Input(InputValidationError::NegativeAmount {
                field: "salary_income",
                value: dec!(-1),
            }))
        );
    }

    #[test]
    fn rejects_invalid_rules() {
        let rules = TaxRules {
            income_tax_brackets: vec![],
            ..TaxRules::default()
        };

        assert_eq!(
            TaxSummary::calculate(&rules, &worked_example()),
            Err(TaxSummaryError::Rules(TaxRulesError::EmptyBracketTable))
        );
    }

    #[test]
    fn display_lists_every_figure() {
        let summary = TaxSummary::calculate(&TaxRules::default(), &worked_example()).unwrap();

        let report = summary.to_string();

        assert!(report.contains("Income tax:                    90300"));
        assert!(report.contains("Resident tax:                  179900"));
        assert!(report.contains("Donation limit:                44394"));
        assert!(report.contains("Income tax saving:             2200"));
        assert!(report.contains("Resident tax saving:           40200"));
        assert!(!report.contains("approximate"));
    }
}
