//! Per-account page ownership within one statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The portion of one page's text owned by a section. A boundary page is
/// shared by two sections, each holding a disjoint slice of its text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSlice {
    pub page: usize,
    pub text: String,
}

/// A claim that a run of pages belongs to one logical account, together
/// with the balances the statement declares for it. Produced only by the
/// segmenter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSection {
    /// Account identifier, e.g. the last-4 suffix
    pub account: String,
    pub beginning_balance: Decimal,
    pub ending_balance: Decimal,
    /// Owned text, in page order
    pub slices: Vec<PageSlice>,
    /// Page the section's summary block appeared on
    pub start_page: usize,
    /// Card-number suffixes known to charge against this account
    pub card_hints: Vec<String>,
}

impl AccountSection {
    pub fn page_indices(&self) -> Vec<usize> {
        self.slices.iter().map(|s| s.page).collect()
    }

    /// Declared balance movement for the period
    pub fn declared_delta(&self) -> Decimal {
        self.ending_balance - self.beginning_balance
    }
}
