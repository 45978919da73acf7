//! Reconciliation: prove (or disprove) that the extracted transactions
//! account for the declared balance movement.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::section::AccountSection;
use crate::transaction::{Category, Transaction};

/// Reconciliation tolerance: one cent.
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Per-account reconciliation report. Derived output, recomputed whenever
/// the transaction set changes; never fed back in as ground truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationResult {
    pub account: String,
    pub beginning_balance: Decimal,
    pub ending_balance: Decimal,
    /// Signed sum per category, only categories that appeared
    pub by_category: BTreeMap<Category, Decimal>,
    /// Sum of positive amounts
    pub total_credits: Decimal,
    /// Sum of negative amounts (itself negative)
    pub total_debits: Decimal,
    pub computed_ending: Decimal,
    /// `ending_balance - computed_ending`: negative when the extracted
    /// transactions overshoot the declared ending balance
    pub discrepancy: Decimal,
    pub reconciles: bool,
}

/// Sum signed amounts by category and compare the computed ending balance
/// against the declared one. Performs no correction: an over-tolerance
/// discrepancy is a factual finding for the caller to investigate.
pub fn reconcile(
    account: &str,
    beginning_balance: Decimal,
    ending_balance: Decimal,
    transactions: &[Transaction],
) -> ReconciliationResult {
    let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    let mut total_credits = Decimal::ZERO;
    let mut total_debits = Decimal::ZERO;

    for txn in transactions {
        *by_category.entry(txn.category).or_insert(Decimal::ZERO) += txn.amount;
        if txn.amount > Decimal::ZERO {
            total_credits += txn.amount;
        } else {
            total_debits += txn.amount;
        }
    }

    let net: Decimal = total_credits + total_debits;
    let computed_ending = beginning_balance + net;
    let discrepancy = ending_balance - computed_ending;

    ReconciliationResult {
        account: account.to_string(),
        beginning_balance,
        ending_balance,
        by_category,
        total_credits,
        total_debits,
        computed_ending,
        discrepancy,
        reconciles: discrepancy.abs() <= tolerance(),
    }
}

/// Convenience wrapper for a segmented section.
pub fn reconcile_section(
    section: &AccountSection,
    transactions: &[Transaction],
) -> ReconciliationResult {
    reconcile(
        &section.account,
        section.beginning_balance,
        section.ending_balance,
        transactions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn txn(amount: Decimal, category: Category) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
            description: "test".to_string(),
            amount,
            category,
            account: "2084".to_string(),
            page: 0,
            line: 0,
            card_hint: None,
            unresolved: false,
        }
    }

    #[test]
    fn test_balanced_section_reconciles() {
        // beginning 100.00, one debit -25.00, one interest +0.05,
        // declared ending 75.05
        let txns = vec![
            txn(dec!(-25.00), Category::Debit),
            txn(dec!(0.05), Category::Interest),
        ];
        let result = reconcile("2084", dec!(100.00), dec!(75.05), &txns);
        assert!(result.reconciles);
        assert_eq!(result.discrepancy, dec!(0.00));
        assert_eq!(result.computed_ending, dec!(75.05));
        assert_eq!(result.total_credits, dec!(0.05));
        assert_eq!(result.total_debits, dec!(-25.00));
    }

    #[test]
    fn test_unbalanced_section_reports_discrepancy() {
        // same transactions, declared ending 75.00 -> five cents over
        let txns = vec![
            txn(dec!(-25.00), Category::Debit),
            txn(dec!(0.05), Category::Interest),
        ];
        let result = reconcile("2084", dec!(100.00), dec!(75.00), &txns);
        assert!(!result.reconciles);
        assert_eq!(result.discrepancy, dec!(-0.05));
        assert_eq!(result.by_category[&Category::Interest], dec!(0.05));
        assert_eq!(result.by_category[&Category::Debit], dec!(-25.00));
    }

    #[test]
    fn test_discrepancy_within_one_cent_passes() {
        let txns = vec![txn(dec!(-24.99), Category::Debit)];
        let result = reconcile("2084", dec!(100.00), dec!(75.00), &txns);
        assert_eq!(result.discrepancy, dec!(-0.01));
        assert!(result.reconciles);
    }

    #[test]
    fn test_empty_section_compares_balances_directly() {
        let result = reconcile("8619", dec!(229.42), dec!(229.42), &[]);
        assert!(result.reconciles);
        assert!(result.by_category.is_empty());

        let result = reconcile("8619", dec!(229.42), dec!(77.59), &[]);
        assert!(!result.reconciles);
        assert_eq!(result.discrepancy, dec!(-151.83));
    }
}
