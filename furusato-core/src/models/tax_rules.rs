use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DeclarationMethod, EarnedIncomeBand, TaxBracket};

/// Errors raised when a [`TaxRules`] value is not usable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRulesError {
    #[error("income tax bracket table is empty")]
    EmptyBracketTable,

    #[error("top income tax bracket must be unbounded")]
    BoundedTopBracket,

    #[error("income tax bracket bounds must be strictly ascending at {0}")]
    UnorderedBrackets(Decimal),

    #[error("earned income deduction schedule is empty")]
    EmptyEarnedIncomeSchedule,

    #[error("top earned income band must be unbounded")]
    BoundedTopEarnedIncomeBand,

    #[error("earned income band bounds must be strictly ascending at {0}")]
    UnorderedEarnedIncomeBands(Decimal),

    #[error("{name} must be between 0 and 1, got {value}")]
    RateOutOfRange { name: &'static str, value: Decimal },

    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },
}

/// Blue-return special deduction per declaration method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingDeductions {
    pub electronic: Decimal,
    pub paper: Decimal,
    pub simple: Decimal,
}

impl Default for FilingDeductions {
    fn default() -> Self {
        Self {
            electronic: dec!(650000),
            paper: dec!(550000),
            simple: dec!(100000),
        }
    }
}

impl FilingDeductions {
    /// Returns the statutory amount for a method, or `None` for an
    /// unrecognized one.
    pub fn amount_for(
        &self,
        method: &DeclarationMethod,
    ) -> Option<Decimal> {
        match method {
            DeclarationMethod::None => Some(Decimal::ZERO),
            DeclarationMethod::Electronic => Some(self.electronic),
            DeclarationMethod::Paper => Some(self.paper),
            DeclarationMethod::Simple => Some(self.simple),
            DeclarationMethod::Unrecognized(_) => None,
        }
    }
}

/// Every statutory constant the engine uses.
///
/// A `TaxRules` value is built once (from [`TaxRules::default`] or a rules
/// file) and borrowed by every calculator, so a different prefecture rate or
/// a later year's brackets never needs a code change. Fields missing from a
/// rules file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRules {
    pub rules_name: String,
    pub earned_income_bands: Vec<EarnedIncomeBand>,
    pub medical_threshold_rate: Decimal,
    pub medical_threshold_cap: Decimal,
    pub filing_deductions: FilingDeductions,
    pub dependent_deduction: Decimal,
    pub spouse_deduction: Decimal,
    pub income_tax_basic_deduction: Decimal,
    pub resident_tax_basic_deduction: Decimal,
    pub income_tax_brackets: Vec<TaxBracket>,
    pub reconstruction_surtax_rate: Decimal,
    pub resident_tax_rate: Decimal,
    pub resident_adjustment_deduction: Decimal,
    pub donation_self_burden: Decimal,
    pub special_credit_cap_rate: Decimal,
    pub income_tax_donation_cap_rate: Decimal,
    pub resident_basic_donation_cap_rate: Decimal,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            rules_name: "default".to_string(),
            earned_income_bands: default_earned_income_bands(),
            medical_threshold_rate: dec!(0.05),
            medical_threshold_cap: dec!(100000),
            filing_deductions: FilingDeductions::default(),
            dependent_deduction: dec!(380000),
            spouse_deduction: dec!(380000),
            income_tax_basic_deduction: dec!(480000),
            resident_tax_basic_deduction: dec!(430000),
            income_tax_brackets: default_income_tax_brackets(),
            reconstruction_surtax_rate: dec!(0.021),
            // Kanagawa prefecture (includes the 0.025% forest levy)
            resident_tax_rate: dec!(0.10025),
            resident_adjustment_deduction: dec!(2500),
            donation_self_burden: dec!(2000),
            special_credit_cap_rate: dec!(0.20),
            income_tax_donation_cap_rate: dec!(0.40),
            resident_basic_donation_cap_rate: dec!(0.30),
        }
    }
}

fn band(
    max_salary: Option<Decimal>,
    rate: Decimal,
    intercept: Decimal,
) -> EarnedIncomeBand {
    EarnedIncomeBand {
        max_salary,
        rate,
        intercept,
    }
}

fn bracket(
    max_income: Option<Decimal>,
    tax_rate: Decimal,
    subtraction: Decimal,
) -> TaxBracket {
    TaxBracket {
        max_income,
        tax_rate,
        subtraction,
    }
}

fn default_earned_income_bands() -> Vec<EarnedIncomeBand> {
    vec![
        band(Some(dec!(1625000)), dec!(0), dec!(550000)),
        band(Some(dec!(1800000)), dec!(0.4), dec!(-100000)),
        band(Some(dec!(3600000)), dec!(0.3), dec!(80000)),
        band(Some(dec!(6600000)), dec!(0.2), dec!(440000)),
        band(Some(dec!(8500000)), dec!(0.1), dec!(1100000)),
        band(None, dec!(0), dec!(1950000)),
    ]
}

fn default_income_tax_brackets() -> Vec<TaxBracket> {
    vec![
        bracket(Some(dec!(1949000)), dec!(0.05), dec!(0)),
        bracket(Some(dec!(3299999)), dec!(0.10), dec!(97500)),
        bracket(Some(dec!(6949999)), dec!(0.20), dec!(427500)),
        bracket(Some(dec!(8999999)), dec!(0.23), dec!(636000)),
        bracket(Some(dec!(17999999)), dec!(0.33), dec!(1536000)),
        bracket(Some(dec!(39999999)), dec!(0.40), dec!(2796000)),
        bracket(None, dec!(0.45), dec!(4796000)),
    ]
}

impl TaxRules {
    /// Validates the rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if:
    /// - either table is empty, unordered, or has a bounded last row
    /// - any rate is outside [0, 1]
    /// - any deduction or constant is negative
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::{TaxRules, TaxRulesError};
    ///
    /// let rules = TaxRules {
    ///     resident_tax_rate: dec!(1.5),
    ///     ..TaxRules::default()
    /// };
    ///
    /// assert_eq!(
    ///     rules.validate(),
    ///     Err(TaxRulesError::RateOutOfRange {
    ///         name: "resident_tax_rate",
    ///         value: dec!(1.5),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), TaxRulesError> {
        validate_brackets(&self.income_tax_brackets)?;
        validate_earned_income_bands(&self.earned_income_bands)?;

        for (name, value) in [
            ("medical_threshold_rate", self.medical_threshold_rate),
            ("reconstruction_surtax_rate", self.reconstruction_surtax_rate),
            ("resident_tax_rate", self.resident_tax_rate),
            ("special_credit_cap_rate", self.special_credit_cap_rate),
            (
                "income_tax_donation_cap_rate",
                self.income_tax_donation_cap_rate,
            ),
            (
                "resident_basic_donation_cap_rate",
                self.resident_basic_donation_cap_rate,
            ),
        ] {
            check_rate(name, value)?;
        }
        for b in &self.income_tax_brackets {
            check_rate("tax_rate", b.tax_rate)?;
        }
        for b in &self.earned_income_bands {
            check_rate("rate", b.rate)?;
        }

        for (name, value) in [
            ("medical_threshold_cap", self.medical_threshold_cap),
            ("filing_deductions.electronic", self.filing_deductions.electronic),
            ("filing_deductions.paper", self.filing_deductions.paper),
            ("filing_deductions.simple", self.filing_deductions.simple),
            ("dependent_deduction", self.dependent_deduction),
            ("spouse_deduction", self.spouse_deduction),
            ("income_tax_basic_deduction", self.income_tax_basic_deduction),
            (
                "resident_tax_basic_deduction",
                self.resident_tax_basic_deduction,
            ),
            (
                "resident_adjustment_deduction",
                self.resident_adjustment_deduction,
            ),
            ("donation_self_burden", self.donation_self_burden),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxRulesError::NegativeAmount { name, value });
            }
        }

        Ok(())
    }
}

fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), TaxRulesError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TaxRulesError::RateOutOfRange { name, value });
    }
    Ok(())
}

/// Checks that bracket bounds ascend strictly and only the last row is open.
pub(crate) fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), TaxRulesError> {
    let (top, bounded) = brackets
        .split_last()
        .ok_or(TaxRulesError::EmptyBracketTable)?;
    if top.max_income.is_some() {
        return Err(TaxRulesError::BoundedTopBracket);
    }
    check_ascending(
        bounded.iter().map(|b| b.max_income),
        TaxRulesError::UnorderedBrackets,
    )
}

pub(crate) fn validate_earned_income_bands(
    bands: &[EarnedIncomeBand]
) -> Result<(), TaxRulesError> {
    let (top, bounded) = bands
        .split_last()
        .ok_or(TaxRulesError::EmptyEarnedIncomeSchedule)?;
    if top.max_salary.is_some() {
        return Err(TaxRulesError::BoundedTopEarnedIncomeBand);
    }
    check_ascending(
        bounded.iter().map(|b| b.max_salary),
        TaxRulesError::UnorderedEarnedIncomeBands,
    )
}

fn check_ascending(
    bounds: impl Iterator<Item = Option<Decimal>>,
    unordered: fn(Decimal) -> TaxRulesError,
) -> Result<(), TaxRulesError> {
    let mut previous: Option<Decimal> = None;
    for bound in bounds {
        // An open bound below the top row can never be followed by anything.
        let bound = bound.ok_or(unordered(Decimal::MAX))?;
        if previous.is_some_and(|p| bound <= p) {
            return Err(unordered(bound));
        }
        previous = Some(bound);
    }
    Ok(())
}
