//! Progressive income tax rate lookup.
//!
//! Each bracket carries a precomputed subtraction constant so the tax is a
//! single multiply-subtract instead of a sum over brackets:
//!
//! | Taxable income (inclusive)  | Rate | Subtraction |
//! |-----------------------------|------|-------------|
//! | up to 1,949,000             | 5%   | 0           |
//! | up to 3,299,999             | 10%  | 97,500      |
//! | up to 6,949,999             | 20%  | 427,500     |
//! | up to 8,999,999             | 23%  | 636,000     |
//! | up to 17,999,999            | 33%  | 1,536,000   |
//! | up to 39,999,999            | 40%  | 2,796,000   |
//! | above                       | 45%  | 4,796,000   |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::tax_rules::validate_brackets;
use crate::{TaxBracket, TaxRulesError};

/// The marginal rate and subtraction constant for one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalRate {
    pub rate: Decimal,
    pub subtraction: Decimal,
    /// Position of the bracket in the table, lowest first.
    pub bracket_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressiveRateTable<'a> {
    bounded: &'a [TaxBracket],
    top: &'a TaxBracket,
}

impl<'a> ProgressiveRateTable<'a> {
    /// Creates a rate table over the given brackets.
    ///
    /// Brackets must be sorted by `max_income` in ascending order and the
    /// last bracket must have `max_income` set to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if the table is empty, unordered, or has a
    /// bounded top bracket.
    pub fn new(brackets: &'a [TaxBracket]) -> Result<Self, TaxRulesError> {
        validate_brackets(brackets)?;
        let (top, bounded) = brackets
            .split_last()
            .ok_or(TaxRulesError::EmptyBracketTable)?;
        Ok(Self { bounded, top })
    }

    /// Looks up the bracket for a taxable income.
    ///
    /// An income exactly on an upper bound belongs to that bracket.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use furusato_core::TaxRules;
    /// use furusato_core::calculations::ProgressiveRateTable;
    ///
    /// let rules = TaxRules::default();
    /// let table = ProgressiveRateTable::new(&rules.income_tax_brackets).unwrap();
    ///
    /// let marginal = table.rate_for(dec!(4420000));
    /// assert_eq!(marginal.rate, dec!(0.20));
    /// assert_eq!(marginal.subtraction, dec!(427500));
    /// ```
    pub fn rate_for(
        &self,
        taxable_income: Decimal,
    ) -> MarginalRate {
        let (bracket_index, bracket) = self
            .bounded
            .iter()
            .enumerate()
            .find(|(_, b)| b.max_income.is_some_and(|max| taxable_income <= max))
            .unwrap_or((self.bounded.len(), self.top));

        MarginalRate {
            rate: bracket.tax_rate,
            subtraction: bracket.subtraction,
            bracket_index,
        }
    }
}
