//! Maximum donation whose deductible part is fully absorbed by the two taxes.
//!
//! The resident tax special credit may not exceed 20% of the resident tax
//! income levy. Setting the credit equal to that cap and solving for the
//! donation `X` gives
//!
//! ```text
//! resident_tax × 20% = (X − 2,000) × shelter_rate
//! X = resident_tax × 20% / shelter_rate + 2,000
//! shelter_rate = 1 − resident_rate − income_rate × (1 + surtax_rate)
//! ```
//!
//! `income_rate` is the marginal bracket of the no-donation income tax base.
//! The solve is closed-form: it does not re-check whether the donation
//! itself moves taxable income into a lower bracket.
//! [`DonationLimits::crosses_bracket`] reports when that happens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, truncate_yen};
use crate::calculations::{IncomeTaxWorksheet, ResidentTaxWorksheet};
use crate::{TaxCalculationInput, TaxRules, TaxRulesError};

/// Errors that can occur while solving for the donation limit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DonationLimitError {
    #[error(transparent)]
    Rules(#[from] TaxRulesError),

    /// The rates leave no room for a special credit, so the limit is
    /// undefined.
    #[error("shelter rate must be positive, got {0}")]
    NonPositiveShelterRate(Decimal),
}

/// The special-credit limit alongside the other statutory ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationLimits {
    /// Limit from the resident tax special credit cap.
    pub special_credit: Decimal,

    /// Limit from the income tax deduction cap (40% of total income).
    pub income_tax_cap: Decimal,

    /// Limit from the resident tax basic credit cap (30% of total income).
    pub resident_basic_cap: Decimal,

    /// Whether donating `special_credit` moves the income tax base into a
    /// lower bracket than the one the limit was derived from.
    pub crosses_bracket: bool,
}

impl DonationLimits {
    /// The binding limit: the smallest of the three ceilings.
    pub fn effective(&self) -> Decimal {
        self.special_credit
            .min(self.income_tax_cap)
            .min(self.resident_basic_cap)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DonationLimitSolver<'a> {
    rules: &'a TaxRules,
    income_tax: IncomeTaxWorksheet<'a>,
    resident_tax: ResidentTaxWorksheet<'a>,
}

impl<'a> DonationLimitSolver<'a> {
    pub fn new(rules: &'a TaxRules) -> Result<Self, TaxRulesError> {
        Ok(Self {
            rules,
            income_tax: IncomeTaxWorksheet::new(rules)?,
            resident_tax: ResidentTaxWorksheet::new(rules)?,
        })
    }

    /// Solves the special-credit cap for the maximum donation.
    ///
    /// # Errors
    ///
    /// Returns [`DonationLimitError::NonPositiveShelterRate`] when the
    /// resident and income tax rates add up to 100% or more.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{DeclarationMethod, DonationLimitSolver, TaxCalculationInput, TaxRules};
    ///
    /// let rules = TaxRules::default();
    /// let solver = DonationLimitSolver::new(&rules).unwrap();
    /// let input = TaxCalculationInput {
    ///     salary_income: dec!(5000000),
    ///     miscellaneous_income: dec!(100000),
    ///     business_income: dec!(500000),
    ///     medical_expenses: dec!(150000),
    ///     social_insurance: dec!(600000),
    ///     dependent_count: 1,
    ///     spouse_deduction: true,
    ///     declaration_method: DeclarationMethod::Electronic,
    /// };
    ///
    /// // 179,900 × 20% / 0.8487 + 2,000
    /// assert_eq!(solver.donation_limit(&input), Ok(dec!(44394)));
    /// ```
    pub fn donation_limit(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<Decimal, DonationLimitError> {
        let shelter_rate = self.resident_tax.shelter_rate(input);
        if shelter_rate <= Decimal::ZERO {
            return Err(DonationLimitError::NonPositiveShelterRate(shelter_rate));
        }

        let resident_baseline = self.resident_tax.resident_tax(input, None, true);
        let cap = resident_baseline * self.rules.special_credit_cap_rate;
        let limit = truncate_yen(cap / shelter_rate) + self.rules.donation_self_burden;

        debug!(
            resident_baseline = %resident_baseline,
            shelter_rate = %shelter_rate,
            limit = %limit,
            "donation limit"
        );

        Ok(limit)
    }

    /// The special-credit limit plus the income-based statutory ceilings.
    pub fn donation_limits(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<DonationLimits, DonationLimitError> {
        let special_credit = self.donation_limit(input)?;

        let total_income = non_negative(
            self.income_tax
                .resolver()
                .deductions()
                .total_income(input),
        );
        let income_tax_cap = truncate_yen(total_income * self.rules.income_tax_donation_cap_rate)
            + self.rules.donation_self_burden;
        let resident_basic_cap =
            truncate_yen(total_income * self.rules.resident_basic_donation_cap_rate)
                + self.rules.donation_self_burden;

        let crosses_bracket = self.crosses_bracket(input, special_credit);
        if crosses_bracket {
            warn!(
                limit = %special_credit,
                "donation at the limit lowers the income tax bracket; limit is approximate"
            );
        }

        Ok(DonationLimits {
            special_credit,
            income_tax_cap,
            resident_basic_cap,
            crosses_bracket,
        })
    }

    fn crosses_bracket(
        &self,
        input: &TaxCalculationInput,
        donation: Decimal,
    ) -> bool {
        let baseline = self.income_tax.baseline_marginal_rate(input);
        let with_donation = self
            .income_tax
            .calculate(input, Some(donation))
            .marginal_rate;
        with_donation.bracket_index != baseline.bracket_index
    }
}
