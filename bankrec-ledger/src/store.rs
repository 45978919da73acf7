//! Persisted monthly ledgers: one CSV per (account, period).
//!
//! Layout mirrors how the records are consumed downstream:
//! `accounts/<institution> <account>/<year>/monthly/<institution>_<account>_<period>_transactions.csv`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use bankrec_core::statement::StatementPeriod;
use bankrec_core::transaction::{Category, Transaction};

pub const STATUS_NEW: &str = "New";

/// One persisted ledger row. Column names are part of the store's contract
/// with downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Transaction Date")]
    pub date: NaiveDate,
    #[serde(rename = "Transaction Type")]
    pub category: Category,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Statement id")]
    pub statement_id: String,
    #[serde(rename = "Bank and last 4")]
    pub account_label: String,
}

impl LedgerRow {
    pub fn from_transaction(
        txn: &Transaction,
        institution: &str,
        period: &StatementPeriod,
    ) -> Self {
        let account_label = format!("{} {}", institution, txn.account);
        Self {
            description: txn.description.clone(),
            amount: txn.amount,
            date: txn.date,
            category: txn.category,
            status: STATUS_NEW.to_string(),
            statement_id: format!("{} - {}", period.label(), account_label),
            account_label,
        }
    }

    /// Rebuild a transaction from a persisted row, for re-checking stored
    /// months against declared balances.
    pub fn to_transaction(&self) -> Transaction {
        let account = self
            .account_label
            .rsplit(' ')
            .next()
            .unwrap_or(&self.account_label)
            .to_string();
        Transaction {
            date: self.date,
            description: self.description.clone(),
            amount: self.amount,
            category: self.category,
            account,
            page: 0,
            line: 0,
            card_hint: None,
            unresolved: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the month's file
    Overwrite,
    /// Keep existing rows and add the new ones after them
    Append,
}

/// Filesystem-backed monthly record store keyed on (account, period).
pub struct LedgerStore {
    root: PathBuf,
}

impl LedgerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn monthly_path(
        &self,
        institution: &str,
        account: &str,
        period: &StatementPeriod,
    ) -> PathBuf {
        let file = format!(
            "{}_{}_{}_transactions.csv",
            institution.to_lowercase(),
            account,
            period.label()
        );
        self.root
            .join("accounts")
            .join(format!("{institution} {account}"))
            .join(period.end.year().to_string())
            .join("monthly")
            .join(file)
    }

    pub fn write_month(
        &self,
        institution: &str,
        account: &str,
        period: &StatementPeriod,
        rows: &[LedgerRow],
        mode: WriteMode,
    ) -> Result<PathBuf> {
        let path = self.monthly_path(institution, account, period);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let mut combined: Vec<LedgerRow> = Vec::new();
        if mode == WriteMode::Append && path.exists() {
            combined = read_rows(&path)?;
        }
        combined.extend(rows.iter().cloned());

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        for row in &combined {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(
            path = %path.display(),
            rows = combined.len(),
            "wrote monthly ledger"
        );
        Ok(path)
    }

    pub fn read_month(
        &self,
        institution: &str,
        account: &str,
        period: &StatementPeriod,
    ) -> Result<Vec<LedgerRow>> {
        read_rows(&self.monthly_path(institution, account, period))
    }
}

/// Read ledger rows from any CSV path with the store's column layout.
pub fn read_rows(path: &Path) -> Result<Vec<LedgerRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: LedgerRow =
            result.with_context(|| format!("reading {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}
