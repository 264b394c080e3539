use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DeclarationMethod;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must be a whole yen amount, got {value}")]
    FractionalAmount { field: &'static str, value: Decimal },
}

/// A taxpayer's income and deductions for one year, in whole yen.
///
/// The value is read-only once loaded. Donation scenarios are expressed as an
/// explicit argument to the calculators, never by editing this struct.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxCalculationInput {
    /// Gross salary, the "payment amount" on the withholding slip.
    pub salary_income: Decimal,
    pub miscellaneous_income: Decimal,
    pub business_income: Decimal,
    /// Medical expenses before the threshold is subtracted.
    pub medical_expenses: Decimal,
    /// Social insurance premiums paid, deducted as-is.
    pub social_insurance: Decimal,
    /// General dependents only; special categories are not modeled.
    pub dependent_count: u32,
    pub spouse_deduction: bool,
    pub declaration_method: DeclarationMethod,
}

impl TaxCalculationInput {
    /// Checks that every amount is a non-negative whole yen value.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        for (field, value) in [
            ("salary_income", self.salary_income),
            ("miscellaneous_income", self.miscellaneous_income),
            ("business_income", self.business_income),
            ("medical_expenses", self.medical_expenses),
            ("social_insurance", self.social_insurance),
        ] {
            if value < Decimal::ZERO {
                return Err(InputValidationError::NegativeAmount { field, value });
            }
            if !value.fract().is_zero() {
                return Err(InputValidationError::FractionalAmount { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_input_is_valid() {
        assert_eq!(TaxCalculationInput::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let input = TaxCalculationInput {
            medical_expenses: dec!(-1),
            ..Default::default()
        };

        assert_eq!(
            input.validate(),
            Err(InputValidationError::NegativeAmount {
                field: "medical_expenses",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_fractional_yen() {
        let input = TaxCalculationInput {
            salary_income: dec!(1000.5),
            ..Default::default()
        };

        assert_eq!(
            input.validate(),
            Err(InputValidationError::FractionalAmount {
                field: "salary_income",
                value: dec!(1000.5),
            })
        );
    }
}
