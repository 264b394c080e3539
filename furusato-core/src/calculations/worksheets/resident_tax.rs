//! Resident tax income levy (the per-capita levy is not included).
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income with the resident tax basic deduction, truncated to 1,000 yen |
//! | 2    | `trunc(taxable × rate) − adjustment deduction` |
//! | 3    | Subtract the donation basic credit `(d − 2,000) × rate` |
//! | 4    | Subtract the special credit `(d − 2,000) × shelter rate` |
//! | 5    | Truncate to 100 yen, floor at zero |
//!
//! Unlike the income tax, a donation is credited against the tax itself.
//! The shelter rate is `1 − resident rate − income rate × (1 + surtax)`,
//! where the income rate is the marginal bracket of the no-donation income
//! tax base.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    TAX_AMOUNT_UNIT, TAXABLE_INCOME_UNIT, non_negative, truncate_to_unit, truncate_yen,
};
use crate::calculations::{ProgressiveRateTable, TaxableIncomeResolver};
use crate::{TaxCalculationInput, TaxRules, TaxRulesError};

/// Intermediate and final values of one resident tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentTaxResult {
    /// Taxable income truncated to 1,000 yen.
    pub taxable_income: Decimal,

    /// Levy after the adjustment deduction, before any donation credit.
    pub levy_before_credits: Decimal,

    /// Donation basic credit (zero when no donation or suppressed).
    pub basic_credit: Decimal,

    /// Donation special credit (zero when no donation or suppressed).
    pub special_credit: Decimal,

    /// Final resident tax, truncated to 100 yen and floored at zero.
    pub resident_tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct ResidentTaxWorksheet<'a> {
    rules: &'a TaxRules,
    resolver: TaxableIncomeResolver<'a>,
    rate_table: ProgressiveRateTable<'a>,
}

impl<'a> ResidentTaxWorksheet<'a> {
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

    /// Share of a donation (above the self-burden) absorbed by the special
    /// credit for this taxpayer.
    ///
    /// May be zero or negative for a rule set outside the statutory range;
    /// callers that divide by it must check.
    pub fn shelter_rate(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        let income_rate = self
            .rate_table
            .rate_for(self.resolver.taxable_income_for_income_tax(input))
            .rate;

        Decimal::ONE
            - self.rules.resident_tax_rate
            - income_rate * (Decimal::ONE + self.rules.reconstruction_surtax_rate)
    }

    /// Resident tax income levy.
    ///
    /// With `suppress_donation` set, the donation credits are not applied
    /// even if a donation is given; that is the baseline the donation effect
    /// is measured against.
    pub fn resident_tax(
        &self,
        input: &TaxCalculationInput,
        donation: Option<Decimal>,
        suppress_donation: bool,
    ) -> Decimal {
        self.calculate(input, donation, suppress_donation)
            .resident_tax
    }

    /// Runs every step and returns the intermediate values.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{ResidentTaxWorksheet, TaxCalculationInput, TaxRules};
    ///
    /// let rules = TaxRules::default();
    /// let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();
    /// let input = TaxCalculationInput {
    ///     salary_income: dec!(8000000),
    ///     social_insurance: dec!(1200000),
    ///     ..Default::default()
    /// };
    ///
    /// let baseline = worksheet.calculate(&input, None, true);
    /// assert_eq!(baseline.taxable_income, dec!(4470000));
    /// assert_eq!(baseline.resident_tax, dec!(445600));
    ///
    /// let with_donation = worksheet.calculate(&input, Some(dec!(130128)), false);
    /// assert!(with_donation.resident_tax < baseline.resident_tax);
    /// ```
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
        donation: Option<Decimal>,
        suppress_donation: bool,
    ) -> ResidentTaxResult {
        let taxable_income = truncate_to_unit(
            self.resolver.taxable_income_for_resident_tax(input),
            TAXABLE_INCOME_UNIT,
        );

        let levy_before_credits = truncate_yen(taxable_income * self.rules.resident_tax_rate)
            - self.rules.resident_adjustment_deduction;

        let (basic_credit, special_credit) = match donation {
            Some(amount) if amount > Decimal::ZERO && !suppress_donation => {
                let deductible = amount - self.rules.donation_self_burden;
                (
                    truncate_yen(deductible * self.rules.resident_tax_rate),
                    truncate_yen(deductible * self.shelter_rate(input)),
                )
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };

        let resident_tax = non_negative(truncate_to_unit(
            levy_before_credits - basic_credit - special_credit,
            TAX_AMOUNT_UNIT,
        ));

        debug!(
            taxable_income = %taxable_income,
            levy = %levy_before_credits,
            basic_credit = %basic_credit,
            special_credit = %special_credit,
            resident_tax = %resident_tax,
            "resident tax"
        );

        ResidentTaxResult {
            taxable_income,
            levy_before_credits,
            basic_credit,
            special_credit,
            resident_tax,
        }
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

    // =========================================================================
    // baseline tests
    // =========================================================================

    #[test]
    fn worked_example_resident_tax() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let result = worksheet.calculate(&worked_example(), None, true);

        assert_eq!(result.taxable_income, dec!(1820000));
        // trunc(1,820,000 * 10.025%) - 2,500
        assert_eq!(result.levy_before_credits, dec!(179955));
        assert_eq!(result.resident_tax, dec!(179900));
    }

    #[test]
    fn suppress_flag_ignores_donation() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();
        let input = worked_example();

        let suppressed = worksheet.calculate(&input, Some(dec!(44394)), true);

        assert_eq!(suppressed.basic_credit, dec!(0));
        assert_eq!(suppressed.special_credit, dec!(0));
        assert_eq!(
            suppressed.resident_tax,
            worksheet.resident_tax(&input, None, true)
        );
    }

    #[test]
    fn flat_ten_percent_rate() {
        let rules = TaxRules {
            resident_tax_rate: dec!(0.10),
            ..TaxRules::default()
        };
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let result = worksheet.calculate(&worked_example(), None, true);

        // 182,000 - 2,500 = 179,500
        assert_eq!(result.resident_tax, dec!(179500));
    }

    #[test]
    fn all_zero_input_clamps_adjustment_to_zero() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let result = worksheet.calculate(&TaxCalculationInput::default(), None, true);

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.levy_before_credits, dec!(-2500));
        assert_eq!(result.resident_tax, dec!(0));
    }

    #[test]
    fn resident_tax_is_non_negative_multiple_of_hundred() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let mut salary = dec!(0);
        while salary <= dec!(30000000) {
            let input = TaxCalculationInput {
                salary_income: salary,
                ..Default::default()
            };
            let tax = worksheet.resident_tax(&input, None, true);
            assert!(tax >= dec!(0));
            assert_eq!(tax % dec!(100), dec!(0), "salary {salary}");
            salary += dec!(437000);
        }
    }

    // =========================================================================
    // donation credit tests
    // =========================================================================

    #[test]
    fn shelter_rate_worked_example() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        // 1 - 0.10025 - 0.05 * 1.021
        assert_eq!(worksheet.shelter_rate(&worked_example()), dec!(0.84870));
    }

    #[test]
    fn donation_credits_worked_example() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let result = worksheet.calculate(&worked_example(), Some(dec!(44394)), false);

        // trunc(42,394 * 0.10025) and trunc(42,394 * 0.8487)
        assert_eq!(result.basic_credit, dec!(4249));
        assert_eq!(result.special_credit, dec!(35979));
        // 179,955 - 4,249 - 35,979 = 139,727
        assert_eq!(result.resident_tax, dec!(139700));
    }

    #[test]
    fn huge_donation_clamps_to_zero() {
        let rules = TaxRules::default();
        let worksheet = ResidentTaxWorksheet::new(&rules).unwrap();

        let result = worksheet.calculate(&worked_example(), Some(dec!(10000000)), false);

        assert_eq!(result.resident_tax, dec!(0));
    }
}
