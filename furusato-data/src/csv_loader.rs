//! CSV loader for batches of taxpayers.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Every
//! column is optional; an absent column or an empty cell takes the same
//! default as a missing field in a single input file.
//!
//! | Column                 | Type    | Notes                                      |
//! |------------------------|---------|--------------------------------------------|
//! | `name`                 | string  | Row label used in reports                  |
//! | `salary_income`        | integer | Yen                                        |
//! | `miscellaneous_income` | integer | Yen                                        |
//! | `business_income`      | integer | Yen                                        |
//! | `medical_expenses`     | integer | Yen                                        |
//! | `social_insurance`     | integer | Yen                                        |
//! | `dependent_count`      | integer |                                            |
//! | `spouse_deduction`     | bool    | `true` / `false`                           |
//! | `declaration_method`   | string  | `none`, `electronic`, `paper`, or `simple` |
//!
//! ### Example
//!
//! ```csv
//! name,salary_income,social_insurance,dependent_count,spouse_deduction
//! single,8000000,1200000,0,false
//! family,12000000,1700000,2,true
//! ```

use std::path::Path;

use furusato_core::{DeclarationMethod, InputValidationError, TaxCalculationInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::InputLoader;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    salary_income: Option<Decimal>,
    #[serde(default)]
    miscellaneous_income: Option<Decimal>,
    #[serde(default)]
    business_income: Option<Decimal>,
    #[serde(default)]
    medical_expenses: Option<Decimal>,
    #[serde(default)]
    social_insurance: Option<Decimal>,
    #[serde(default)]
    dependent_count: Option<u32>,
    #[serde(default)]
    spouse_deduction: Option<bool>,
    #[serde(default)]
    declaration_method: Option<String>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One taxpayer from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub name: Option<String>,
    pub input: TaxCalculationInput,
}

impl BatchRow {
    /// The row's name, or `row N` when the file has no name for it.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("row {}", self.row),
        }
    }
}

/// Errors that can occur while loading a batch file.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),

    /// Structural problems or a cell that does not parse as its type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("invalid input on row {row}: {source}")]
    InvalidInput {
        row: usize,
        source: InputValidationError,
    },

    /// Only raised by a strict loader.
    #[error("unrecognized declaration method '{method}' on row {row}")]
    UnrecognizedDeclarationMethod { method: String, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
    loader: &InputLoader,
) -> Result<BatchRow, CsvLoadError> {
    let input = TaxCalculationInput {
        salary_income: row.salary_income.unwrap_or_default(),
        miscellaneous_income: row.miscellaneous_income.unwrap_or_default(),
        business_income: row.business_income.unwrap_or_default(),
        medical_expenses: row.medical_expenses.unwrap_or_default(),
        social_insurance: row.social_insurance.unwrap_or_default(),
        dependent_count: row.dependent_count.unwrap_or_default(),
        spouse_deduction: row.spouse_deduction.unwrap_or_default(),
        declaration_method: row
            .declaration_method
            .as_deref()
            .map(DeclarationMethod::parse)
            .unwrap_or_default(),
    };

    input
        .validate()
        .map_err(|source| CsvLoadError::InvalidInput {
            row: row_number,
            source,
        })?;

    if !input.declaration_method.is_recognized() {
        if loader.is_strict() {
            return Err(CsvLoadError::UnrecognizedDeclarationMethod {
                method: input.declaration_method.to_string(),
                row: row_number,
            });
        }
        warn!(
            row = row_number,
            method = %input.declaration_method,
            "unrecognized declaration method; no filing deduction will apply"
        );
    }

    Ok(BatchRow {
        row: row_number,
        name: row.name,
        input,
    })
}

/// Parses CSV text and returns the rows in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a cell has the
///   wrong type.
/// * [`CsvLoadError::InvalidInput`] for a negative or fractional amount.
/// * [`CsvLoadError::UnrecognizedDeclarationMethod`] for an unknown method
///   when `loader` is strict.
pub fn load_from_str(
    input: &str,
    loader: &InputLoader,
) -> Result<Vec<BatchRow>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1, loader)
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    loader: &InputLoader,
) -> Result<Vec<BatchRow>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents, loader)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
salary_income
5000000
";

    const MULTI_ROW_CSV: &str = "\
name,salary_income,social_insurance,dependent_count,spouse_deduction,declaration_method
single,8000000,1200000,0,false,
family,12000000,1700000,2,true,none
,3000000,,,,
";

    // -----------------------------------------------------------------------
    // 1. Minimal CSV: one column, everything else defaults
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_defaults() {
        let rows = load_from_str(MINIMAL_CSV, &InputLoader::default()).expect("should parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].name, None);
        assert_eq!(
            rows[0].input,
            TaxCalculationInput {
                salary_income: dec!(5000000),
                ..Default::default()
            }
        );
    }

    // -----------------------------------------------------------------------
    // 2. Multiple rows: order, names, empty cells
    // -----------------------------------------------------------------------
    #[test]
    fn test_multi_row_order_and_values() {
        let rows = load_from_str(MULTI_ROW_CSV, &InputLoader::default()).expect("should parse");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name.as_deref(), Some("single"));
        assert_eq!(rows[0].input.social_insurance, dec!(1200000));
        assert_eq!(rows[1].input.dependent_count, 2);
        assert!(rows[1].input.spouse_deduction);
        assert_eq!(rows[2].input.social_insurance, dec!(0));
        assert_eq!(rows[2].input.dependent_count, 0);
    }

    #[test]
    fn test_labels_fall_back_to_row_number() {
        let rows = load_from_str(MULTI_ROW_CSV, &InputLoader::default()).expect("should parse");

        assert_eq!(rows[0].label(), "single");
        assert_eq!(rows[2].label(), "row 3");
    }

    #[test]
    fn test_declaration_method_case_insensitive() {
        let csv = "business_income,declaration_method\n500000,Electronic\n500000,PAPER\n";
        let rows = load_from_str(csv, &InputLoader::default()).expect("should parse");

        assert_eq!(rows[0].input.declaration_method, DeclarationMethod::Electronic);
        assert_eq!(rows[1].input.declaration_method, DeclarationMethod::Paper);
    }

    // -----------------------------------------------------------------------
    // 3. Errors carry 1-based row numbers
    // -----------------------------------------------------------------------
    #[test]
    fn test_negative_amount_reports_row() {
        let csv = "salary_income,medical_expenses\n1000000,0\n1000000,-10\n";

        match load_from_str(csv, &InputLoader::default()).unwrap_err() {
            CsvLoadError::InvalidInput { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(
                    source,
                    InputValidationError::NegativeAmount {
                        field: "medical_expenses",
                        value: dec!(-10),
                    }
                );
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_rejects_unknown_method() {
        let csv = "declaration_method\nnone\nabacus\n";

        match load_from_str(csv, &InputLoader::new(true)).unwrap_err() {
            CsvLoadError::UnrecognizedDeclarationMethod { method, row } => {
                assert_eq!(method, "abacus");
                assert_eq!(row, 2);
            }
            other => panic!("expected UnrecognizedDeclarationMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_keeps_unknown_method() {
        let csv = "declaration_method\nabacus\n";
        let rows = load_from_str(csv, &InputLoader::default()).expect("lenient load");

        assert!(!rows[0].input.declaration_method.is_recognized());
    }

    // -----------------------------------------------------------------------
    // 4. Parse errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_non_numeric_amount_returns_parse_error() {
        let csv = "salary_income\nlots\n";

        assert!(matches!(
            load_from_str(csv, &InputLoader::default()),
            Err(CsvLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_ragged_row_returns_parse_error() {
        let csv = "salary_income,social_insurance\n1000000\n";

        assert!(matches!(
            load_from_str(csv, &InputLoader::default()),
            Err(CsvLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let rows =
            load_from_str("name,salary_income\n", &InputLoader::default()).expect("header only");

        assert!(rows.is_empty());
    }
}
