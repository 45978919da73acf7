//! Resolve ownership of transactions that section membership alone cannot
//! prove. Reassignment happens at most once per transaction, before
//! reconciliation; anything still doubtful is flagged, never guessed.

use tracing::{debug, warn};

use bankrec_core::config::ExtractConfig;
use bankrec_core::section::AccountSection;
use bankrec_core::transaction::Transaction;

/// Apply attribution rules in priority order: card-suffix mapping, then
/// configured payer/payee association. A rule can only move a transaction
/// to a section that exists in the current statement.
pub fn resolve(
    transactions: &mut [Transaction],
    config: &ExtractConfig,
    sections: &[AccountSection],
) {
    for txn in transactions.iter_mut() {
        if let Some(hint) = txn.card_hint.clone() {
            // already sitting in the section that owns this card
            let confirmed = sections
                .iter()
                .any(|s| s.account == txn.account && s.card_hints.iter().any(|c| *c == hint));
            if confirmed {
                continue;
            }

            match config.account_for_card(&hint) {
                Some(account) if sections.iter().any(|s| s.account == account) => {
                    debug!(
                        from = %txn.account,
                        to = %account,
                        card = %hint,
                        "reattributed transaction via card suffix"
                    );
                    txn.account = account.to_string();
                }
                Some(account) => {
                    warn!(
                        card = %hint,
                        account = %account,
                        "card suffix maps to an account absent from this statement"
                    );
                    txn.unresolved = true;
                }
                None => {
                    warn!(
                        card = %hint,
                        description = %txn.description,
                        "unknown card suffix; transaction needs manual review"
                    );
                    txn.unresolved = true;
                }
            }
            continue;
        }

        if let Some(account) = config.payee_account(&txn.description, txn.amount) {
            if sections.iter().any(|s| s.account == account) {
                if account != txn.account {
                    debug!(
                        from = %txn.account,
                        to = %account,
                        "reattributed transaction via payee rule"
                    );
                    txn.account = account.to_string();
                }
            } else {
                warn!(
                    account = %account,
                    description = %txn.description,
                    "payee rule targets an account absent from this statement"
                );
                txn.unresolved = true;
            }
        }
    }
}
