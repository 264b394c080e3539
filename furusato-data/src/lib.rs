//! File loaders for taxpayer input, batch CSV, and rule sets.

pub mod csv_loader;
mod loader;
mod rules;

pub use csv_loader::{BatchRow, CsvLoadError};
pub use loader::{DEFAULT_INPUT_FILE, InputFormat, InputLoadError, InputLoader, input_to_yaml};
pub use rules::{RulesLoadError, load_rules, rules_from_str};
