use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use bankrec_core::config::{AccountRule, ExtractConfig, PayeeRule};
use bankrec_core::statement::StatementPeriod;

pub const DEFAULT_CONFIG_FILE: &str = "bankrec.toml";

/// Load the extraction config. An explicit path must exist; otherwise
/// `./bankrec.toml` is used when present, falling back to an empty config
/// (explicit account identifiers in the statement still work).
pub fn load_config(path: Option<&Path>) -> Result<ExtractConfig> {
    match path {
        Some(p) => read_config(p),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if p.exists() {
                read_config(&p)
            } else {
                Ok(ExtractConfig {
                    institution: "Bank".to_string(),
                    accounts: Vec::new(),
                    payee_rules: Vec::new(),
                })
            }
        }
    }
}

fn read_config(path: &Path) -> Result<ExtractConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Write a starter config showing every rule kind.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    let sample = ExtractConfig {
        institution: "Chase".to_string(),
        accounts: vec![
            AccountRule {
                id: "2084".to_string(),
                full_number: Some("000000837532084".to_string()),
                card_suffixes: vec!["0885".to_string()],
                known_beginning_balances: vec![],
            },
            AccountRule {
                id: "1873".to_string(),
                full_number: Some("000000526021873".to_string()),
                card_suffixes: vec!["0665".to_string()],
                known_beginning_balances: vec![],
            },
        ],
        payee_rules: vec![PayeeRule {
            pattern: "ADP - Tax".to_string(),
            account: "1873".to_string(),
            direction: bankrec_core::config::Direction::Debit,
        }],
    };
    let s = toml::to_string_pretty(&sample).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Parse a `YYYY-MM` period label into a whole-month statement period.
pub fn parse_month_label(label: &str) -> Result<StatementPeriod> {
    let (year, month) = label
        .split_once('-')
        .with_context(|| format!("invalid period '{label}', expected YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in period '{label}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in period '{label}'"))?;
    StatementPeriod::from_month(year, month)
        .with_context(|| format!("period '{label}' is not a valid month"))
}
