//! Rule-set files.
//!
//! A rules file is a TOML document holding any subset of the [`TaxRules`]
//! fields. Absent fields keep their defaults, so overriding the resident
//! tax rate for another prefecture is a one-line file:
//!
//! ```toml
//! rules_name = "flat 10%"
//! resident_tax_rate = 0.10
//! ```

use std::path::{Path, PathBuf};

use furusato_core::{TaxRules, TaxRulesError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RulesLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid tax rules: {0}")]
    Invalid(#[from] TaxRulesError),
}

/// Parses and validates a rules document.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use furusato_data::rules_from_str;
///
/// let rules = rules_from_str("resident_tax_rate = 0.10").unwrap();
///
/// assert_eq!(rules.resident_tax_rate, dec!(0.10));
/// assert_eq!(rules.donation_self_burden, dec!(2000));
/// ```
pub fn rules_from_str(contents: &str) -> Result<TaxRules, RulesLoadError> {
    let rules: TaxRules = toml::from_str(contents)?;
    rules.validate()?;
    Ok(rules)
}

pub fn load_rules(path: &Path) -> Result<TaxRules, RulesLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RulesLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = rules_from_str(&contents)?;

    debug!(path = %path.display(), rules = %rules.rules_name, "loaded tax rules");
    Ok(rules)
}
