mod declaration_method;
mod tax_bracket;
pub(crate) mod tax_rules;
mod taxpayer_input;

pub use declaration_method::DeclarationMethod;
pub use tax_bracket::{EarnedIncomeBand, TaxBracket};
pub use tax_rules::{FilingDeductions, TaxRules, TaxRulesError};
pub use taxpayer_input::{InputValidationError, TaxCalculationInput};
