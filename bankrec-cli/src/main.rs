use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bankrec_core::reconcile::reconcile;
use bankrec_core::statement::{Page, Statement, StatementPeriod};
use bankrec_ingest::extract_statement;
use bankrec_ledger::{report, LedgerRow, LedgerStore, WriteMode};

mod config;

#[derive(Parser, Debug)]
#[command(name = "bankrec", version, about = "Statement extraction and reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract statement page text into per-account monthly ledgers
    Extract {
        /// A text file with form-feed page breaks, or a directory of
        /// per-page .txt files in order
        input: PathBuf,

        /// Extraction config (TOML); defaults to ./bankrec.toml if present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Root directory for the ledger store (default: current directory)
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Statement period as YYYY-MM; derived from the input filename
        /// when omitted
        #[arg(long)]
        period: Option<String>,

        /// Keep existing rows for the month instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Re-check a stored monthly ledger against declared balances
    Check {
        /// Path to a monthly ledger CSV
        csv: PathBuf,

        /// Declared beginning balance
        #[arg(long)]
        beginning: Decimal,

        /// Declared ending balance
        #[arg(long)]
        ending: Decimal,
    },

    /// Write a starter config file
    InitConfig {
        #[arg(default_value = config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let passed = match cli.command {
        Command::Extract {
            input,
            config,
            out,
            period,
            append,
        } => run_extract(&input, config.as_deref(), &out, period.as_deref(), append)?,

        Command::Check {
            csv,
            beginning,
            ending,
        } => run_check(&csv, beginning, ending)?,

        Command::InitConfig { path } => {
            config::init_config(&path)?;
            true
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn run_extract(
    input: &Path,
    config_path: Option<&Path>,
    out: &Path,
    period: Option<&str>,
    append: bool,
) -> Result<bool> {
    let cfg = config::load_config(config_path)?;
    let period = resolve_period(input, period)?;
    let pages = load_pages(input)?;
    let statement = Statement::new(cfg.institution.clone(), period, pages);

    let extraction = extract_statement(&statement, &cfg)
        .with_context(|| format!("extracting {}", input.display()))?;

    let store = LedgerStore::new(out);
    let mode = if append {
        WriteMode::Append
    } else {
        WriteMode::Overwrite
    };

    for account in &extraction.accounts {
        let rows: Vec<LedgerRow> = account
            .transactions
            .iter()
            .map(|t| LedgerRow::from_transaction(t, &statement.institution, &statement.period))
            .collect();
        let path = store.write_month(
            &statement.institution,
            &account.section.account,
            &statement.period,
            &rows,
            mode,
        )?;
        println!(
            "Account {}: {} transactions -> {}",
            account.section.account,
            account.transactions.len(),
            path.display()
        );

        for dropped in &account.dropped {
            println!(
                "  dropped (page {}, line {}): {}",
                dropped.page, dropped.line, dropped.text
            );
        }
        println!();
        print!("{}", report::render(&account.recon));
        println!();
    }

    let unresolved: Vec<_> = extraction.unresolved().collect();
    if !unresolved.is_empty() {
        println!("Needs manual review:");
        for txn in &unresolved {
            println!(
                "  {} {} {} (account {} unconfirmed)",
                txn.date, txn.description, txn.amount, txn.account
            );
        }
        println!();
    }

    if extraction.all_reconcile() {
        println!("All accounts reconcile.");
    } else {
        println!("Reconciliation FAILED for at least one account.");
    }
    Ok(extraction.all_reconcile())
}

fn run_check(csv: &Path, beginning: Decimal, ending: Decimal) -> Result<bool> {
    let rows = bankrec_ledger::read_rows(csv)?;
    if rows.is_empty() {
        bail!("{} contains no rows", csv.display());
    }
    let transactions: Vec<_> = rows.iter().map(LedgerRow::to_transaction).collect();
    let account = transactions[0].account.clone();

    let recon = reconcile(&account, beginning, ending, &transactions);
    print!("{}", report::render(&recon));
    Ok(recon.reconciles)
}

/// Statement period: explicit flag first, then the filename convention
/// (`YYYYMMDD-statements-…` names the closing date).
fn resolve_period(input: &Path, flag: Option<&str>) -> Result<StatementPeriod> {
    if let Some(label) = flag {
        return config::parse_month_label(label);
    }
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    match StatementPeriod::from_statement_filename(name) {
        Some(period) => Ok(period),
        None => bail!(
            "cannot determine statement period from '{}'; pass --period YYYY-MM",
            name
        ),
    }
}

/// Page text: either one file with form-feed separators or a directory of
/// page files consumed in sorted order.
fn load_pages(input: &Path) -> Result<Vec<Page>> {
    if input.is_dir() {
        let mut paths: Vec<PathBuf> = fs::read_dir(input)
            .with_context(|| format!("reading {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        paths.sort();
        if paths.is_empty() {
            bail!("{} contains no .txt pages", input.display());
        }
        let mut pages = Vec::new();
        for (index, path) in paths.iter().enumerate() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            pages.push(Page { index, text });
        }
        Ok(pages)
    } else {
        let text = fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;
        Ok(text
            .split('\x0c')
            .enumerate()
            .map(|(index, text)| Page {
                index,
                text: text.to_string(),
            })
            .collect())
    }
}
