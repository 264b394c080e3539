//! Individual income deductions.
//!
//! | Deduction      | Rule |
//! |----------------|------|
//! | Earned income  | banded schedule on gross salary |
//! | Medical        | expenses above `min(total income × 5%, 100,000)` |
//! | Filing method  | blue-return amount, capped at business income |
//! | Dependents     | 380,000 each |
//! | Spouse         | 380,000 when claimed |

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, truncate_yen};
use crate::models::tax_rules::validate_earned_income_bands;
use crate::{DeclarationMethod, EarnedIncomeBand, TaxCalculationInput, TaxRules, TaxRulesError};

/// Computes each deduction from a taxpayer input.
#[derive(Debug, Clone, Copy)]
pub struct DeductionCalculator<'a> {
    rules: &'a TaxRules,
    bounded_bands: &'a [EarnedIncomeBand],
    top_band: &'a EarnedIncomeBand,
}

impl<'a> DeductionCalculator<'a> {
    /// Creates a calculator over the given rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if the earned income schedule is empty,
    /// unordered, or its last band is bounded.
    pub fn new(rules: &'a TaxRules) -> Result<Self, TaxRulesError> {
        validate_earned_income_bands(&rules.earned_income_bands)?;
        let (top_band, bounded_bands) = rules
            .earned_income_bands
            .split_last()
            .ok_or(TaxRulesError::EmptyEarnedIncomeSchedule)?;
        Ok(Self {
            rules,
            bounded_bands,
            top_band,
        })
    }

    /// Earned income deduction for a gross salary.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::TaxRules;
    /// use furusato_core::calculations::DeductionCalculator;
    ///
    /// let rules = TaxRules::default();
    /// let deductions = DeductionCalculator::new(&rules).unwrap();
    ///
    /// assert_eq!(deductions.earned_income_deduction(dec!(5000000)), dec!(1440000));
    /// ```
    pub fn earned_income_deduction(
        &self,
        salary: Decimal,
    ) -> Decimal {
        let band = self
            .bounded_bands
            .iter()
            .find(|b| b.max_salary.is_some_and(|max| salary <= max))
            .unwrap_or(self.top_band);

        truncate_yen(salary * band.rate) + band.intercept
    }

    /// Salary after its deduction, plus the other income categories.
    pub fn total_income(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        input.salary_income - self.earned_income_deduction(input.salary_income)
            + input.miscellaneous_income
            + input.business_income
    }

    pub fn medical_deduction(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        let total_income = self.total_income(input);
        let threshold = truncate_yen(
            (total_income * self.rules.medical_threshold_rate)
                .min(self.rules.medical_threshold_cap),
        );

        non_negative(input.medical_expenses - threshold)
    }

    /// Blue-return special deduction, never more than the business income.
    ///
    /// An unrecognized method deducts nothing and logs a warning.
    pub fn business_filing_deduction(
        &self,
        method: &DeclarationMethod,
        business_income: Decimal,
    ) -> Decimal {
        let base = match self.rules.filing_deductions.amount_for(method) {
            Some(amount) => amount,
            None => {
                warn!(
                    method = %method,
                    "unrecognized declaration method; no filing deduction applied"
                );
                Decimal::ZERO
            }
        };

        base.min(business_income)
    }

    pub fn dependent_deduction(
        &self,
        count: u32,
    ) -> Decimal {
        Decimal::from(count) * self.rules.dependent_deduction
    }

    pub fn spouse_deduction_amount(
        &self,
        claimed: bool,
    ) -> Decimal {
        if claimed {
            self.rules.spouse_deduction
        } else {
            Decimal::ZERO
        }
    }

    /// Sum of every deduction except the regime-specific basic deduction.
    pub fn deductions_before_basic(
        &self,
        input: &TaxCalculationInput,
    ) -> Decimal {
        let medical = self.medical_deduction(input);
        let filing =
            self.business_filing_deduction(&input.declaration_method, input.business_income);
        let dependents = self.dependent_deduction(input.dependent_count);
        let spouse = self.spouse_deduction_amount(input.spouse_deduction);

        debug!(
            medical = %medical,
            filing = %filing,
            social_insurance = %input.social_insurance,
            dependents = %dependents,
            spouse = %spouse,
            "deductions"
        );

        medical + filing + input.social_insurance + dependents + spouse
    }
}
