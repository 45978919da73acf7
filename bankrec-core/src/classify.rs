//! Deterministic description -> category rules.
//!
//! Keyword match in priority order, first match wins. The match runs on the
//! raw description (before reference tokens are stripped) because ACH trace
//! tokens like `PPD ID:` are themselves a classification signal.

use rust_decimal::Decimal;

use crate::money::ParsedAmount;
use crate::transaction::{Category, Sign};

/// Categorize a transaction description.
pub fn classify(description: &str) -> Category {
    let desc = description.to_lowercase();

    if desc.contains("interest payment") {
        return Category::Interest;
    }

    if desc.contains("check") && desc.contains('#') {
        return Category::Check;
    }

    // Covers "Card Purchase" and "Recurring Card Purchase"
    if desc.contains("card purchase") {
        return Category::Debit;
    }

    if desc.contains("online payment") || desc.contains("bill payment") {
        return Category::Payment;
    }

    if desc.contains("transfer to") {
        return Category::Transfer;
    }

    if desc.contains("transfer from") {
        return Category::Deposit;
    }

    if desc.contains("deposit")
        || desc.contains("cashout")
        || desc.contains("refund")
        || desc.contains("reversal")
        || desc.contains("adjustment credit")
    {
        return Category::Deposit;
    }

    if desc.contains("fee") {
        return Category::Fee;
    }

    // Venmo sends are ACH-traced but are ordinary withdrawals; checked
    // before the trace-token rule below
    if desc.contains("venmo payment") {
        return Category::Withdrawal;
    }

    // ACH entries with payment wording are incoming credits
    let ach_traced =
        desc.contains("ppd id:") || desc.contains("ccd id:") || desc.contains("web id:");
    if ach_traced && (desc.contains("payment") || desc.contains("pmt")) {
        return Category::Credit;
    }

    // Conservative default
    Category::Withdrawal
}

/// Apply the two-tier sign rule: an explicit sign in the source text is
/// honored; otherwise the category's default sign decides. Source
/// formatting is inconsistent about pre-signing debits, which is why the
/// category tier exists at all.
pub fn signed_amount(amount: &ParsedAmount, category: Category) -> Decimal {
    if amount.explicit_negative {
        return -amount.magnitude;
    }
    match category.default_sign() {
        Sign::Credit => amount.magnitude,
        Sign::Debit => -amount.magnitude,
    }
}
