//! Transaction record types shared across the extraction pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction categories matched deterministically from descriptions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Check,
    Debit,
    Transfer,
    Payment,
    Deposit,
    Withdrawal,
    Interest,
    Fee,
    Credit,
}

/// Direction a category moves money when the source text carries no sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Credit,
    Debit,
}

impl Category {
    /// All categories, in report order
    pub const ALL: [Category; 9] = [
        Category::Check,
        Category::Debit,
        Category::Transfer,
        Category::Payment,
        Category::Deposit,
        Category::Withdrawal,
        Category::Interest,
        Category::Fee,
        Category::Credit,
    ];

    /// Sign applied when the amount was printed without one
    pub fn default_sign(&self) -> Sign {
        match self {
            Category::Deposit | Category::Interest | Category::Credit => Sign::Credit,
            _ => Sign::Debit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Check => "Check",
            Category::Debit => "Debit",
            Category::Transfer => "Transfer",
            Category::Payment => "Payment",
            Category::Deposit => "Deposit",
            Category::Withdrawal => "Withdrawal",
            Category::Interest => "Interest",
            Category::Fee => "Fee",
            Category::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Check" => Ok(Category::Check),
            "Debit" => Ok(Category::Debit),
            "Transfer" => Ok(Category::Transfer),
            "Payment" => Ok(Category::Payment),
            "Deposit" => Ok(Category::Deposit),
            "Withdrawal" => Ok(Category::Withdrawal),
            "Interest" => Ok(Category::Interest),
            "Fee" => Ok(Category::Fee),
            "Credit" => Ok(Category::Credit),
            other => Err(format!("unknown transaction category: {other}")),
        }
    }
}

/// One dated, typed, signed ledger entry extracted from statement text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Normalized description (whitespace collapsed, reference tokens stripped)
    pub description: String,
    /// Signed amount. Positive = credit, negative = debit.
    pub amount: Decimal,
    pub category: Category,
    /// Identifier of the owning account (e.g. the last-4 suffix)
    pub account: String,
    /// Page index the entry was extracted from
    pub page: usize,
    /// First line of the source fragment within that page
    pub line: usize,
    /// Trailing card-number token, if the entry carried one
    pub card_hint: Option<String>,
    /// Set when attribution could not confirm the owning account
    pub unresolved: bool,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
