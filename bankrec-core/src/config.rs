//! Injectable extraction configuration.
//!
//! Everything here used to live as hardcoded constants next to the parsing
//! code: known account numbers, card-to-account pairs, balance values that
//! identify an account when nothing else does, payer/payee associations.
//! Making it data lets the same engine run against unseen statements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One known account within a combined statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRule {
    /// Identifier used everywhere downstream, e.g. the last-4 suffix
    pub id: String,
    /// Full account number as printed in summary blocks
    #[serde(default)]
    pub full_number: Option<String>,
    /// Card-number suffixes whose purchases belong to this account
    #[serde(default)]
    pub card_suffixes: Vec<String>,
    /// Beginning balances previously observed for this account. Fragile,
    /// used only when no explicit identifier is present.
    #[serde(default)]
    pub known_beginning_balances: Vec<Decimal>,
}

/// Direction constraint for a payee rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
    #[default]
    Any,
}

/// A payer/payee deterministically associated with one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayeeRule {
    /// Case-insensitive substring matched against the description
    pub pattern: String,
    pub account: String,
    #[serde(default)]
    pub direction: Direction,
}

/// Extraction configuration for one institution's statements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    /// Label used in statement ids and ledger paths, e.g. "Chase"
    pub institution: String,
    /// Known accounts in the order they usually appear in the document;
    /// position is the last-resort identity fallback
    #[serde(default)]
    pub accounts: Vec<AccountRule>,
    #[serde(default)]
    pub payee_rules: Vec<PayeeRule>,
}

impl ExtractConfig {
    /// Account owning a card suffix, if configured.
    pub fn account_for_card(&self, suffix: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| a.card_suffixes.iter().any(|c| c == suffix))
            .map(|a| a.id.as_str())
    }

    /// Account previously observed with this beginning balance.
    pub fn account_for_balance(&self, beginning: Decimal) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| a.known_beginning_balances.contains(&beginning))
            .map(|a| a.id.as_str())
    }

    /// Account whose full number appears in the given text.
    pub fn account_for_number(&self, text: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| {
                a.full_number
                    .as_deref()
                    .is_some_and(|n| !n.is_empty() && text.contains(n))
            })
            .map(|a| a.id.as_str())
    }

    /// Positional fallback: the nth summary block seen maps to the nth
    /// configured account.
    pub fn account_at(&self, position: usize) -> Option<&str> {
        self.accounts.get(position).map(|a| a.id.as_str())
    }

    /// First payee rule matching the description and amount direction.
    pub fn payee_account(&self, description: &str, amount: Decimal) -> Option<&str> {
        let desc = description.to_lowercase();
        self.payee_rules
            .iter()
            .find(|r| {
                let direction_ok = match r.direction {
                    Direction::Credit => amount > Decimal::ZERO,
                    Direction::Debit => amount < Decimal::ZERO,
                    Direction::Any => true,
                };
                direction_ok && desc.contains(&r.pattern.to_lowercase())
            })
            .map(|r| r.account.as_str())
    }
}
