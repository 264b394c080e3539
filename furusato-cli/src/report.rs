//! Plain-text rendering of results.

use std::fmt::Write;

use furusato_core::{DonationEffect, TaxSummary};
use furusato_data::BatchRow;

/// The donation effect table printed for `--amount`.
pub fn render_effects(effects: &[DonationEffect]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>12} {:>12} {:>12} {:>12} {:>12}",
        "Donation", "Income tax", "Resident tax", "Total", "Out of pocket"
    );
    for effect in effects {
        let _ = writeln!(
            out,
            "{:>12} {:>12} {:>12} {:>12} {:>12}",
            effect.amount,
            effect.income_tax_saving,
            effect.resident_tax_saving,
            effect.total_saving,
            effect.out_of_pocket
        );
    }
    out
}

/// One line per batch row: label, both taxes, and the binding limit.
pub fn render_batch(results: &[(BatchRow, TaxSummary)]) -> String {
    let width = results
        .iter()
        .map(|(row, _)| row.label().chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$} {:>12} {:>12} {:>12} {:>12}",
        "Name", "Income tax", "Resident tax", "Limit", "Effective"
    );
    for (row, summary) in results {
        let _ = writeln!(
            out,
            "{:<width$} {:>12} {:>12} {:>12} {:>12}{}",
            row.label(),
            summary.income_tax,
            summary.resident_tax,
            summary.donation_limit(),
            summary.limits.effective(),
            if summary.limits.crosses_bracket {
                "  *"
            } else {
                ""
            }
        );
    }
    if results.iter().any(|(_, s)| s.limits.crosses_bracket) {
        let _ = writeln!(out, "* limit lowers the income tax bracket; approximate");
    }
    out
}
