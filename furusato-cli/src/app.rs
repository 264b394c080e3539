use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use furusato_core::{DonationEffectCalculator, TaxCalculationInput, TaxRules, TaxSummary};
use furusato_data::{BatchRow, InputLoader, csv_loader, input_to_yaml, load_rules};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::report;

/// Everything a run needs, already parsed from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub rules: Option<PathBuf>,
    pub batch: Option<PathBuf>,
    pub strict: bool,
    pub amounts: Vec<Decimal>,
}

/// Loads the rules file, or the built-in rules when none is given.
pub fn load_tax_rules(path: Option<&Path>) -> Result<TaxRules> {
    match path {
        Some(path) => {
            let rules = load_rules(path)
                .with_context(|| format!("Failed to load rules: {}", path.display()))?;
            info!(rules = %rules.rules_name, "using rules file");
            Ok(rules)
        }
        None => Ok(TaxRules::default()),
    }
}

/// The single-taxpayer report: input echo, summary, optional effect table.
pub fn single_report(
    rules: &TaxRules,
    input: &TaxCalculationInput,
    amounts: &[Decimal],
) -> Result<String> {
    let summary = TaxSummary::calculate(rules, input).context("Failed to compute taxes")?;

    let mut out = input_to_yaml(input).context("Failed to render input")?;
    out.push('\n');
    out.push_str(&summary.to_string());
    out.push('\n');

    if !amounts.is_empty() {
        let calculator = DonationEffectCalculator::new(rules)?;
        out.push('\n');
        out.push_str(&report::render_effects(&calculator.effects(input, amounts)));
    }

    Ok(out)
}

/// Computes a summary for every row, stopping at the first failure.
pub fn batch_summaries(
    rules: &TaxRules,
    rows: Vec<BatchRow>,
) -> Result<Vec<(BatchRow, TaxSummary)>> {
    rows.into_iter()
        .map(|row| {
            let summary = TaxSummary::calculate(rules, &row.input)
                .with_context(|| format!("Failed to compute taxes for {}", row.label()))?;
            Ok((row, summary))
        })
        .collect()
}

/// Runs the command and returns the text to print.
pub fn run(options: &RunOptions) -> Result<String> {
    let rules = load_tax_rules(options.rules.as_deref())?;
    let loader = InputLoader::new(options.strict);

    if let Some(batch) = &options.batch {
        let rows = csv_loader::load_from_file(batch, &loader)
            .with_context(|| format!("Failed to load batch: {}", batch.display()))?;
        debug!(rows = rows.len(), "loaded batch");
        let results = batch_summaries(&rules, rows)?;
        return Ok(report::render_batch(&results));
    }

    let input = loader
        .load_file(&options.input)
        .with_context(|| format!("Failed to load input: {}", options.input.display()))?;
    single_report(&rules, &input, &options.amounts)
}
