use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{IncomeTaxWorksheet, ResidentTaxWorksheet};
use crate::{TaxCalculationInput, TaxRules, TaxRulesError};

/// Tax reduction produced by one hypothetical donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationEffect {
    pub amount: Decimal,
    pub income_tax_saving: Decimal,
    pub resident_tax_saving: Decimal,
    /// Sum of both savings.
    pub total_saving: Decimal,
    /// What the donation really costs: `amount - total_saving`.
    pub out_of_pocket: Decimal,
}

/// Measures a donation by diffing each tax with and without it.
#[derive(Debug, Clone, Copy)]
pub struct DonationEffectCalculator<'a> {
    income_tax: IncomeTaxWorksheet<'a>,
    resident_tax: ResidentTaxWorksheet<'a>,
}

impl<'a> DonationEffectCalculator<'a> {
    pub fn new(rules: &'a TaxRules) -> Result<Self, TaxRulesError> {
        Ok(Self {
            income_tax: IncomeTaxWorksheet::new(rules)?,
            resident_tax: ResidentTaxWorksheet::new(rules)?,
        })
    }

    pub fn income_tax_saving(
        &self,
        input: &TaxCalculationInput,
        amount: Decimal,
    ) -> Decimal {
        self.income_tax.income_tax(input, None) - self.income_tax.income_tax(input, Some(amount))
    }

    pub fn resident_tax_saving(
        &self,
        input: &TaxCalculationInput,
        amount: Decimal,
    ) -> Decimal {
        self.resident_tax.resident_tax(input, None, true)
            - self.resident_tax.resident_tax(input, Some(amount), false)
    }

    /// Both savings and the resulting out-of-pocket cost.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{DonationEffectCalculator, TaxCalculationInput, TaxRules};
    ///
    /// let rules = TaxRules::default();
    /// let calculator = DonationEffectCalculator::new(&rules).unwrap();
    /// let input = TaxCalculationInput {
    ///     salary_income: dec!(8000000),
    ///     social_insurance: dec!(1200000),
    ///     ..Default::default()
    /// };
    ///
    /// let effect = calculator.effect(&input, dec!(130128));
    ///
    /// assert_eq!(effect.income_tax_saving, dec!(26300));
    /// assert_eq!(effect.resident_tax_saving, dec!(102000));
    /// assert_eq!(effect.out_of_pocket, dec!(1828));
    /// ```
    pub fn effect(
        &self,
        input: &TaxCalculationInput,
        amount: Decimal,
    ) -> DonationEffect {
        let income_tax_saving = self.income_tax_saving(input, amount);
        let resident_tax_saving = self.resident_tax_saving(input, amount);
        let total_saving = income_tax_saving + resident_tax_saving;

        DonationEffect {
            amount,
            income_tax_saving,
            resident_tax_saving,
            total_saving,
            out_of_pocket: amount - total_saving,
        }
    }

    /// Evaluates several candidate amounts, in the given order.
    pub fn effects(
        &self,
        input: &TaxCalculationInput,
        amounts: &[Decimal],
    ) -> Vec<DonationEffect> {
        amounts
            .iter()
            .map(|amount| self.effect(input, *amount))
            .collect()
    }
}
