use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the progressive income tax table.
///
/// `max_income` is an inclusive upper bound; `None` marks the open-ended top
/// bracket. The tax for a taxable income in this bracket is
/// `taxable_income * tax_rate - subtraction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub subtraction: Decimal,
}

/// One band of the earned-income (salary) deduction schedule.
///
/// The deduction for a salary in this band is
/// `trunc(salary * rate) + intercept`. A flat band has a zero rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedIncomeBand {
    pub max_salary: Option<Decimal>,
    pub rate: Decimal,
    pub intercept: Decimal,
}
