//! Partition a statement's pages into per-account sections.
//!
//! A page that declares a beginning/ending balance pair opens a section.
//! Pages that continue a transaction table extend the open section. A page
//! carrying both the tail of one account and the next account's summary is
//! split at the summary heading, so each side owns disjoint text.

use anyhow::Result;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use bankrec_core::config::ExtractConfig;
use bankrec_core::error::ExtractError;
use bankrec_core::money::parse_amount;
use bankrec_core::section::{AccountSection, PageSlice};
use bankrec_core::statement::Statement;

/// Segmentation output: sections plus the pages no section claimed
/// (covers, disclosure inserts).
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub sections: Vec<AccountSection>,
    pub unassigned: Vec<usize>,
}

/// One summary block located within a page.
struct SummaryBlock {
    /// Byte offset of the block's heading line within the page text
    offset: usize,
    beginning: Decimal,
    ending: Decimal,
    /// Range to search for an explicit account identifier
    ident_start: usize,
    ident_end: usize,
    /// Where to continue scanning for another block on the same page
    resume: usize,
}

pub struct Segmenter {
    beginning_balance: Regex,
    ending_balance: Regex,
    summary_heading: Regex,
    detail_header: Regex,
    column_header: Regex,
    continued: Regex,
    explicit_ident: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            beginning_balance: Regex::new(r"(?i)beginning balance\s*:?\s*(-?\s*\$?\d[\d,]*\.\d{2})")?,
            ending_balance: Regex::new(r"(?i)ending balance\s*:?\s*(-?\s*\$?\d[\d,]*\.\d{2})")?,
            summary_heading: Regex::new(r"(?m)^[^\n]*SUMMARY[^\n]*$")?,
            detail_header: Regex::new(r"TRANSACTION DETAIL")?,
            column_header: Regex::new(r"(?m)^\s*DATE\s+DESCRIPTION")?,
            continued: Regex::new(r"(?i)\(continued\)")?,
            explicit_ident: Regex::new(r"(?i)account ending in\s*\.*\s*(\d{4})")?,
        })
    }

    pub fn segment(&self, statement: &Statement, config: &ExtractConfig) -> Result<Segmentation> {
        let label = format!("{} {}", statement.institution, statement.period.label());
        if statement.pages.is_empty() {
            return Err(ExtractError::EmptyStatement { statement: label }.into());
        }

        let mut sections: Vec<AccountSection> = Vec::new();
        let mut open: Option<usize> = None;
        let mut unassigned: Vec<usize> = Vec::new();
        let mut summaries_seen = 0usize;

        for page in &statement.pages {
            let text = page.text.as_str();

            let mut blocks = Vec::new();
            let mut from = 0usize;
            while let Some(block) = self.find_summary(text, from) {
                from = block.resume;
                blocks.push(block);
            }

            if blocks.is_empty() {
                match open {
                    Some(idx) if self.is_continuation(text) => {
                        sections[idx].slices.push(PageSlice {
                            page: page.index,
                            text: text.to_string(),
                        });
                    }
                    _ => {
                        debug!(page = page.index, "page not claimed by any account section");
                        unassigned.push(page.index);
                    }
                }
                continue;
            }

            let mut cursor = 0usize;
            for (bi, block) in blocks.iter().enumerate() {
                // text before the summary heading belongs to the account
                // being closed (boundary page)
                if block.offset > cursor {
                    let prefix = &text[cursor..block.offset];
                    if let Some(idx) = open {
                        if !prefix.trim().is_empty() {
                            sections[idx].slices.push(PageSlice {
                                page: page.index,
                                text: prefix.to_string(),
                            });
                        }
                    }
                }

                let ident_slice = &text[block.ident_start..block.ident_end];
                let account = self.resolve_identity(
                    ident_slice,
                    block.beginning,
                    summaries_seen,
                    page.index,
                    config,
                )?;
                summaries_seen += 1;

                let region_end = blocks.get(bi + 1).map_or(text.len(), |next| next.offset);
                let region = text[block.offset..region_end].to_string();

                match sections.iter().position(|s| s.account == account) {
                    Some(idx) => {
                        // the same account surfacing again is a continuation,
                        // not a new section; first declared balances win
                        sections[idx].slices.push(PageSlice {
                            page: page.index,
                            text: region,
                        });
                        open = Some(idx);
                    }
                    None => {
                        debug!(
                            account = %account,
                            page = page.index,
                            "opened account section"
                        );
                        let card_hints = config
                            .accounts
                            .iter()
                            .find(|a| a.id == account)
                            .map(|a| a.card_suffixes.clone())
                            .unwrap_or_default();
                        sections.push(AccountSection {
                            account,
                            beginning_balance: block.beginning,
                            ending_balance: block.ending,
                            slices: vec![PageSlice {
                                page: page.index,
                                text: region,
                            }],
                            start_page: page.index,
                            card_hints,
                        });
                        open = Some(sections.len() - 1);
                    }
                }
                cursor = region_end;
            }
        }

        if summaries_seen == 0 {
            return Err(ExtractError::NoAccountSummary { statement: label }.into());
        }

        Ok(Segmentation {
            sections,
            unassigned,
        })
    }

    /// Locate the next labeled beginning/ending balance pair at or after
    /// `from`. The block's heading is the last `…SUMMARY…` line before the
    /// beginning-balance label, falling back to the label's own line.
    fn find_summary(&self, text: &str, from: usize) -> Option<SummaryBlock> {
        let region = &text[from..];
        let begin_caps = self.beginning_balance.captures(region)?;
        let begin_match = begin_caps.get(0)?;
        let begin_start = from + begin_match.start();
        let beginning = parse_amount(&begin_caps[1])?.printed_value();

        let after_begin = from + begin_match.end();
        let end_caps = self.ending_balance.captures(&text[after_begin..])?;
        let end_match = end_caps.get(0)?;
        let ending = parse_amount(&end_caps[1])?.printed_value();
        let resume = after_begin + end_match.end();

        let line_start = text[..begin_start].rfind('\n').map_or(0, |i| i + 1);
        let mut offset = line_start.max(from);
        for m in self.summary_heading.find_iter(&text[from..begin_start]) {
            offset = from + m.start();
        }

        // the identifier must come from the summary block itself, not from
        // page headers or transaction rows further down
        let ident_end = self
            .detail_header
            .find(&text[begin_start..])
            .map_or(text.len(), |m| begin_start + m.start());

        Some(SummaryBlock {
            offset,
            beginning,
            ending,
            ident_start: offset,
            ident_end,
            resume,
        })
    }

    fn resolve_identity(
        &self,
        ident_slice: &str,
        beginning: Decimal,
        position: usize,
        page: usize,
        config: &ExtractConfig,
    ) -> Result<String> {
        // explicit identifier always wins, even over configured order
        if let Some(caps) = self.explicit_ident.captures(ident_slice) {
            return Ok(caps[1].to_string());
        }
        if let Some(id) = config.account_for_number(ident_slice) {
            return Ok(id.to_string());
        }
        if let Some(id) = config.account_for_balance(beginning) {
            debug!(account = id, page, "account identified via known balance");
            return Ok(id.to_string());
        }
        if let Some(id) = config.account_at(position) {
            debug!(account = id, page, position, "account identified by position");
            return Ok(id.to_string());
        }
        Err(ExtractError::AmbiguousAccount { page }.into())
    }

    fn is_continuation(&self, text: &str) -> bool {
        self.continued.is_match(text)
            || self.detail_header.is_match(text)
            || self.column_header.is_match(text)
    }
}
