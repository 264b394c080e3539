//! Single-taxpayer input files.
//!
//! The format is chosen from the file extension: `.yml` / `.yaml` for YAML,
//! `.toml` for TOML. Field names are the snake_case names of
//! [`TaxCalculationInput`]; every field is optional and defaults to zero,
//! `false`, or `none`.
//!
//! ```yaml
//! salary_income: 5000000
//! miscellaneous_income: 100000
//! business_income: 500000
//! medical_expenses: 150000
//! social_insurance: 600000
//! dependent_count: 1
//! spouse_deduction: true
//! declaration_method: electronic
//! ```

use std::path::{Path, PathBuf};

use furusato_core::{InputValidationError, TaxCalculationInput};
use thiserror::Error;
use tracing::{debug, warn};

/// Input file used when none is given.
pub const DEFAULT_INPUT_FILE: &str = "furusato.yml";

#[derive(Debug, Error)]
pub enum InputLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported input file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] InputValidationError),

    #[error("unrecognized declaration method '{0}'")]
    UnrecognizedDeclarationMethod(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Toml,
}

impl InputFormat {
    /// Picks the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Reads and validates taxpayer input.
///
/// In strict mode an unrecognized `declaration_method` is an error. Otherwise
/// it is kept and the deduction calculator treats it as zero with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLoader {
    strict: bool,
}

impl InputLoader {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Parses input text in the given format.
    ///
    /// # Errors
    ///
    /// * [`InputLoadError::Yaml`] / [`InputLoadError::Toml`] when the text
    ///   does not parse.
    /// * [`InputLoadError::Invalid`] for a negative or fractional amount.
    /// * [`InputLoadError::UnrecognizedDeclarationMethod`] in strict mode.
    ///
    /// # Example
    ///
    /// ```
    /// use furusato_core::DeclarationMethod;
    /// use furusato_data::{InputFormat, InputLoader};
    ///
    /// let input = InputLoader::default()
    ///     .load_str("salary_income: 5000000\ndeclaration_method: Paper\n", InputFormat::Yaml)
    ///     .unwrap();
    ///
    /// assert_eq!(input.declaration_method, DeclarationMethod::Paper);
    /// assert_eq!(input.dependent_count, 0);
    /// ```
    pub fn load_str(
        &self,
        contents: &str,
        format: InputFormat,
    ) -> Result<TaxCalculationInput, InputLoadError> {
        let input: TaxCalculationInput = match format {
            InputFormat::Yaml => serde_yaml::from_str(contents)?,
            InputFormat::Toml => toml::from_str(contents)?,
        };
        self.check(input)
    }

    /// Reads a file and delegates to [`InputLoader::load_str`].
    pub fn load_file(
        &self,
        path: &Path,
    ) -> Result<TaxCalculationInput, InputLoadError> {
        let format = InputFormat::from_path(path)
            .ok_or_else(|| InputLoadError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = std::fs::read_to_string(path).map_err(|source| InputLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), ?format, "loading taxpayer input");
        self.load_str(&contents, format)
    }

    /// Applies the checks shared by every input source.
    pub fn check(
        &self,
        input: TaxCalculationInput,
    ) -> Result<TaxCalculationInput, InputLoadError> {
        input.validate()?;

        if !input.declaration_method.is_recognized() {
            if self.strict {
                return Err(InputLoadError::UnrecognizedDeclarationMethod(
                    input.declaration_method.to_string(),
                ));
            }
            warn!(
                method = %input.declaration_method,
                "unrecognized declaration method; no filing deduction will apply"
            );
        }

        Ok(input)
    }
}

/// Renders the input as YAML, in the same shape it is read.
pub fn input_to_yaml(input: &TaxCalculationInput) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(input)
}

#[cfg(test)]
mod tests {
    use furusato_core::DeclarationMethod;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const FULL_YAML: &str = "\
salary_income: 5000000
miscellaneous_income: 100000
business_income: 500000
medical_expenses: 150000
social_insurance: 600000
dependent_count: 1
spouse_deduction: true
declaration_method: electronic
";

    const FULL_TOML: &str = r#"
salary_income = 5000000
miscellaneous_income = 100000
business_income = 500000
medical_expenses = 150000
social_insurance = 600000
dependent_count = 1
spouse_deduction = true
declaration_method = "electronic"
"#;

    fn worked_example() -> TaxCalculationInput {
        TaxCalculationInput {
            salary_income: dec!(5000000),
            miscellaneous_income: dec!(100000),
            business_income: dec!(500000),
            medical_expenses: dec!(150000),
            social_insurance: dec!(600000),
            dependent_count: 1,
            spouse_deduction: true,
            declaration_method: DeclarationMethod::Electronic,
        }
    }

    // =========================================================================
    // format detection
    // =========================================================================

    #[test]
    fn format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("furusato.yml")),
            Some(InputFormat::Yaml)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("a/b.YAML")),
            Some(InputFormat::Yaml)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("input.toml")),
            Some(InputFormat::Toml)
        );
        assert_eq!(InputFormat::from_path(Path::new("input.json")), None);
        assert_eq!(InputFormat::from_path(Path::new("input")), None);
    }

    // =========================================================================
    // parsing
    // =========================================================================

    #[test]
    fn yaml_full_document() {
        let input = InputLoader::default()
            .load_str(FULL_YAML, InputFormat::Yaml)
            .unwrap();

        assert_eq!(input, worked_example());
    }

    #[test]
    fn toml_full_document() {
        let input = InputLoader::default()
            .load_str(FULL_TOML, InputFormat::Toml)
            .unwrap();

        assert_eq!(input, worked_example());
    }

    #[test]
    fn missing_fields_default() {
        let input = InputLoader::default()
            .load_str("salary_income: 3000000\n", InputFormat::Yaml)
            .unwrap();

        assert_eq!(input.salary_income, dec!(3000000));
        assert_eq!(input.business_income, dec!(0));
        assert!(!input.spouse_deduction);
        assert_eq!(input.declaration_method, DeclarationMethod::None);
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let result = InputLoader::default().load_str("salary_income: [1, 2\n", InputFormat::Yaml);

        assert!(matches!(result, Err(InputLoadError::Yaml(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = InputLoader::default().load_str("salary_income = ", InputFormat::Toml);

        assert!(matches!(result, Err(InputLoadError::Toml(_))));
    }

    #[test]
    fn negative_amount_rejected() {
        let result = InputLoader::default().load_str("medical_expenses: -5\n", InputFormat::Yaml);

        match result {
            Err(InputLoadError::Invalid(InputValidationError::NegativeAmount { field, .. })) => {
                assert_eq!(field, "medical_expenses");
            }
            other => panic!("expected NegativeAmount, got {other:?}"),
        }
    }

    // =========================================================================
    // declaration method handling
    // =========================================================================

    #[test]
    fn unrecognized_method_kept_when_lenient() {
        let input = InputLoader::new(false)
            .load_str("declaration_method: abacus\n", InputFormat::Yaml)
            .unwrap();

        assert_eq!(
            input.declaration_method,
            DeclarationMethod::Unrecognized("abacus".to_string())
        );
    }

    #[test]
    fn unrecognized_method_rejected_when_strict() {
        let result =
            InputLoader::new(true).load_str("declaration_method: abacus\n", InputFormat::Yaml);

        match result {
            Err(InputLoadError::UnrecognizedDeclarationMethod(method)) => {
                assert_eq!(method, "abacus");
            }
            other => panic!("expected UnrecognizedDeclarationMethod, got {other:?}"),
        }
    }

    // =========================================================================
    // files
    // =========================================================================

    #[test]
    fn unsupported_extension() {
        let result = InputLoader::default().load_file(Path::new("input.json"));

        assert!(matches!(result, Err(InputLoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = InputLoader::default().load_file(Path::new("/nonexistent/furusato.yml"));

        assert!(matches!(result, Err(InputLoadError::Io { .. })));
    }

    #[test]
    fn yaml_render_reloads() {
        let yaml = input_to_yaml(&worked_example()).unwrap();

        assert!(yaml.contains("declaration_method: electronic"));
        let reloaded = InputLoader::default()
            .load_str(&yaml, InputFormat::Yaml)
            .unwrap();
        assert_eq!(reloaded, worked_example());
    }
}
