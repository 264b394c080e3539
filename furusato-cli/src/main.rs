use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;

use furusato_cli::app::{self, RunOptions};
use furusato_cli::logging;
use furusato_data::DEFAULT_INPUT_FILE;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Hometown-tax (furusato nozei) donation limit calculator.
///
/// Computes the income tax and resident tax for one taxpayer, the largest
/// donation whose deductible part the two taxes fully absorb, and the
/// savings at that limit.
#[derive(Debug, Parser)]
#[command(name = "furusato", version, about, long_about = None)]
struct Cli {
    /// Taxpayer input file (YAML or TOML).
    #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// TOML file overriding the built-in tax rules.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// CSV file with one taxpayer per row; prints one line per row.
    #[arg(short, long, conflicts_with = "amount")]
    batch: Option<PathBuf>,

    /// Reject unrecognized declaration methods instead of warning.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Also show the savings for this donation amount. Repeatable.
    #[arg(short, long = "amount", value_name = "YEN")]
    amount: Vec<Decimal>,

    /// Log level or filter directive; overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file as well.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "parsed arguments");

    let options = RunOptions {
        input: cli.input,
        rules: cli.rules,
        batch: cli.batch,
        strict: cli.strict,
        amounts: cli.amount,
    };

    let output = app::run(&options)?;
    print!("{output}");

    Ok(())
}
