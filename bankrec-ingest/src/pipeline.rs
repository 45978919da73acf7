//! End-to-end extraction for one statement: segment, tokenize, parse,
//! classify, attribute, reconcile.

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use bankrec_core::classify::{classify, signed_amount};
use bankrec_core::config::ExtractConfig;
use bankrec_core::reconcile::{reconcile_section, ReconciliationResult};
use bankrec_core::section::AccountSection;
use bankrec_core::statement::Statement;
use bankrec_core::transaction::{Category, Transaction};

use crate::attribution;
use crate::parser::EntryParser;
use crate::segmenter::Segmenter;
use crate::tokenizer::Tokenizer;

/// A date-led fragment that never resolved to an amount. Kept for the
/// report; the transaction set must stay traceable to source text, so these
/// are surfaced instead of guessed at.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFragment {
    pub page: usize,
    pub line: usize,
    pub text: String,
}

/// Everything extracted for one account.
#[derive(Debug, Clone)]
pub struct AccountExtraction {
    pub section: AccountSection,
    pub transactions: Vec<Transaction>,
    pub dropped: Vec<DroppedFragment>,
    pub recon: ReconciliationResult,
}

/// Full result for one statement.
#[derive(Debug, Clone)]
pub struct StatementExtraction {
    pub accounts: Vec<AccountExtraction>,
    pub unassigned_pages: Vec<usize>,
}

impl StatementExtraction {
    pub fn all_reconcile(&self) -> bool {
        self.accounts.iter().all(|a| a.recon.reconciles)
    }

    /// Transactions whose ownership needs manual review.
    pub fn unresolved(&self) -> impl Iterator<Item = &Transaction> {
        self.accounts
            .iter()
            .flat_map(|a| a.transactions.iter().filter(|t| t.unresolved))
    }

    pub fn dropped_count(&self) -> usize {
        self.accounts.iter().map(|a| a.dropped.len()).sum()
    }
}

/// Run the whole pipeline over one statement. Deterministic: identical
/// input text yields identical output.
pub fn extract_statement(
    statement: &Statement,
    config: &ExtractConfig,
) -> Result<StatementExtraction> {
    let segmenter = Segmenter::new()?;
    let tokenizer = Tokenizer::new()?;
    let entry_parser = EntryParser::new()?;
    let service_fee = Regex::new(r"(?i)monthly service fee\s*-?\s*\$?\s*(\d[\d,]*\.\d{2})")?;

    let segmentation = segmenter.segment(statement, config)?;

    let mut all_transactions: Vec<Transaction> = Vec::new();
    let mut dropped_per_section: Vec<Vec<DroppedFragment>> = Vec::new();

    for section in &segmentation.sections {
        let mut dropped = Vec::new();
        let mut section_txns: Vec<Transaction> = Vec::new();

        for slice in &section.slices {
            for fragment in tokenizer.tokenize(slice.page, &slice.text) {
                let Some(entry) = entry_parser.parse(&fragment) else {
                    warn!(
                        account = %section.account,
                        page = fragment.page,
                        line = fragment.line,
                        text = %fragment.text,
                        "dropped fragment without a resolvable amount"
                    );
                    dropped.push(DroppedFragment {
                        page: fragment.page,
                        line: fragment.line,
                        text: fragment.text,
                    });
                    continue;
                };

                let Some(date) = statement.period.date_for(entry.month, entry.day) else {
                    warn!(
                        account = %section.account,
                        page = entry.page,
                        line = entry.line,
                        month = entry.month,
                        day = entry.day,
                        "dropped fragment with an impossible date"
                    );
                    dropped.push(DroppedFragment {
                        page: entry.page,
                        line: entry.line,
                        text: fragment.text,
                    });
                    continue;
                };

                let category = classify(&entry.raw_description);
                let amount = signed_amount(&entry.amount, category);
                section_txns.push(Transaction {
                    date,
                    description: entry.description,
                    amount,
                    category,
                    account: section.account.clone(),
                    page: entry.page,
                    line: entry.line,
                    card_hint: entry.card_hint,
                    unresolved: false,
                });
            }
        }

        supplement_service_fee(&service_fee, statement, section, &mut section_txns);

        all_transactions.append(&mut section_txns);
        dropped_per_section.push(dropped);
    }

    attribution::resolve(&mut all_transactions, config, &segmentation.sections);

    let mut accounts = Vec::new();
    for (section, dropped) in segmentation.sections.into_iter().zip(dropped_per_section) {
        let mut transactions: Vec<Transaction> = all_transactions
            .iter()
            .filter(|t| t.account == section.account)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            (a.date, a.page, a.line).cmp(&(b.date, b.page, b.line))
        });

        let recon = reconcile_section(&section, &transactions);
        info!(
            account = %section.account,
            transactions = transactions.len(),
            reconciles = recon.reconciles,
            "account extraction complete"
        );
        accounts.push(AccountExtraction {
            section,
            transactions,
            dropped,
            recon,
        });
    }

    Ok(StatementExtraction {
        accounts,
        unassigned_pages: segmentation.unassigned,
    })
}

/// Service fees often appear only in the account's fee box, not as a dated
/// detail row. When the section text declares one and no Fee transaction
/// was parsed, emit the fee dated at the section's last activity. The
/// amount comes straight from the text — nothing is invented.
fn supplement_service_fee(
    service_fee: &Regex,
    statement: &Statement,
    section: &AccountSection,
    transactions: &mut Vec<Transaction>,
) {
    if transactions.iter().any(|t| t.category == Category::Fee) {
        return;
    }

    for slice in &section.slices {
        if let Some(caps) = service_fee.captures(&slice.text) {
            let Some(parsed) = bankrec_core::money::parse_amount(&caps[1]) else {
                return;
            };
            let date = transactions
                .iter()
                .map(|t| t.date)
                .max()
                .unwrap_or(statement.period.end);
            info!(
                account = %section.account,
                amount = %parsed.magnitude,
                "monthly service fee taken from summary box"
            );
            transactions.push(Transaction {
                date,
                description: "Monthly Service Fee".to_string(),
                amount: -parsed.magnitude,
                category: Category::Fee,
                account: section.account.clone(),
                page: slice.page,
                line: 0,
                card_hint: None,
                unresolved: false,
            });
            return;
        }
    }
}
