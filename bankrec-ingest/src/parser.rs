//! Turn candidate fragments into raw dated entries.

use anyhow::Result;
use regex::Regex;
use rust_decimal::Decimal;

use bankrec_core::money::{parse_amount, ParsedAmount};

use crate::tokenizer::Fragment;

/// A parsed but not yet classified entry. Month/day stay split because the
/// year is only known once the statement period is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub month: u32,
    pub day: u32,
    /// Normalized: whitespace collapsed, reference tokens stripped
    pub description: String,
    /// Whitespace-collapsed only; classification keys on tokens that
    /// normalization strips (ACH trace ids)
    pub raw_description: String,
    pub amount: ParsedAmount,
    /// Trailing running balance, when the table prints one
    pub balance: Option<Decimal>,
    /// Trailing card-number token, captured before stripping
    pub card_hint: Option<String>,
    pub page: usize,
    pub line: usize,
}

pub struct EntryParser {
    lead: Regex,
    duplicate_date: Regex,
    tail_with_balance: Regex,
    tail_amount_only: Regex,
    card_suffix: Regex,
    reference_token: Regex,
    whitespace: Regex,
}

impl EntryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lead: Regex::new(r"^\s*(\d{1,2})/(\d{1,2})\s+(.*)$")?,
            duplicate_date: Regex::new(r"^\d{1,2}/\d{1,2}\s+")?,
            tail_with_balance: Regex::new(
                r"(?P<amt>-?\s*\$?\d[\d,]*\.\d{2})\s+(?P<bal>-?\s*\$?\d[\d,]*\.\d{2})\s*$",
            )?,
            tail_amount_only: Regex::new(r"(?P<amt>-?\s*\$?\d[\d,]*\.\d{2})\s*$")?,
            card_suffix: Regex::new(r"(?i)\bcard\s+(\d{4})\s*$")?,
            reference_token: Regex::new(
                r"(?i)\b(?:(?:web|ppd|ccd)\s+id:?\s*\S+|transaction\s*#:?\s*\S+)\s*$",
            )?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Parse one fragment. `None` means the fragment must be dropped
    /// (and logged by the caller) — never guessed at.
    pub fn parse(&self, fragment: &Fragment) -> Option<RawEntry> {
        let caps = self.lead.captures(&fragment.text)?;
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;

        let mut rest = caps[3].trim().to_string();
        // extracted text sometimes repeats the row date; drop the duplicate
        if let Some(m) = self.duplicate_date.find(&rest) {
            rest = rest[m.end()..].to_string();
        }

        let (body, amount, balance) = self.split_tail(&rest)?;

        let raw_description = self
            .whitespace
            .replace_all(body.trim(), " ")
            .into_owned();
        if raw_description.is_empty() {
            return None;
        }
        let (description, card_hint) = self.normalize(&raw_description);
        if description.is_empty() {
            return None;
        }

        Some(RawEntry {
            month,
            day,
            description,
            raw_description,
            amount,
            balance,
            card_hint,
            page: fragment.page,
            line: fragment.line,
        })
    }

    /// Read the trailing amount (and optional running balance) off the
    /// accumulated text. Returns the leading description body.
    fn split_tail<'a>(&self, rest: &'a str) -> Option<(&'a str, ParsedAmount, Option<Decimal>)> {
        if let Some(caps) = self.tail_with_balance.captures(rest) {
            let amount = parse_amount(&caps["amt"])?;
            let balance = parse_amount(&caps["bal"])?.printed_value();
            let start = caps.get(0).map_or(0, |m| m.start());
            return Some((&rest[..start], amount, Some(balance)));
        }
        if let Some(caps) = self.tail_amount_only.captures(rest) {
            let amount = parse_amount(&caps["amt"])?;
            let start = caps.get(0).map_or(0, |m| m.start());
            return Some((&rest[..start], amount, None));
        }
        None
    }

    /// Strip trailing reference tokens and the card suffix, collapsing what
    /// remains. The card suffix is kept aside as an attribution hint.
    fn normalize(&self, raw: &str) -> (String, Option<String>) {
        let mut desc = raw.trim().to_string();
        let mut card_hint = None;

        loop {
            let before = desc.len();

            if let Some(stripped) = desc.strip_suffix('-') {
                desc = stripped.trim_end().to_string();
            }

            let card = self
                .card_suffix
                .captures(&desc)
                .map(|c| (c.get(0).map_or(0, |m| m.start()), c[1].to_string()));
            if let Some((start, suffix)) = card {
                card_hint = Some(suffix);
                desc.truncate(start);
                desc = desc.trim_end().to_string();
            }

            let reference = self.reference_token.find(&desc).map(|m| m.start());
            if let Some(start) = reference {
                desc.truncate(start);
                desc = desc.trim_end().to_string();
            }

            if desc.len() == before {
                break;
            }
        }

        (desc, card_hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(text: &str) -> Option<RawEntry> {
        let fragment = Fragment {
            page: 2,
            line: 7,
            text: text.to_string(),
        };
        EntryParser::new().unwrap().parse(&fragment)
    }

    #[test]
    fn test_interest_row() {
        let entry = parse("02/07 Interest Payment 0.09").unwrap();
        assert_eq!((entry.month, entry.day), (2, 7));
        assert_eq!(entry.description, "Interest Payment");
        assert_eq!(entry.amount.magnitude, dec!(0.09));
        assert!(!entry.amount.explicit_negative);
        assert_eq!(entry.balance, None);
    }

    #[test]
    fn test_amount_and_running_balance() {
        let entry = parse("01/22 Check # 998 -280.00 13,238.65").unwrap();
        assert_eq!(entry.description, "Check # 998");
        assert_eq!(entry.amount.magnitude, dec!(280.00));
        assert!(entry.amount.explicit_negative);
        assert_eq!(entry.balance, Some(dec!(13238.65)));
    }

    #[test]
    fn test_reference_tokens_stripped_but_kept_for_classification() {
        let entry = parse("01/13 Venmo Payment 1039580470057 Web ID: 3264681992 -101.29 2,769.80")
            .unwrap();
        assert_eq!(entry.description, "Venmo Payment 1039580470057");
        assert!(entry.raw_description.contains("Web ID: 3264681992"));
    }

    #[test]
    fn test_card_suffix_captured_and_stripped() {
        let entry = parse(
            "01/27 Card Purchase 01/24 Amazon Mktpl*Zg4WI9R Amzn.Com/Bill WA Card 0885 -46.33 2,723.47",
        )
        .unwrap();
        assert_eq!(entry.card_hint.as_deref(), Some("0885"));
        assert_eq!(
            entry.description,
            "Card Purchase 01/24 Amazon Mktpl*Zg4WI9R Amzn.Com/Bill WA"
        );
        assert_eq!(entry.amount.magnitude, dec!(46.33));
    }

    #[test]
    fn test_transaction_reference_stripped() {
        let entry =
            parse("02/06 Online Transfer To Chk ...8619 Transaction#: 23637622827 -1,695.53 11,416.48")
                .unwrap();
        assert_eq!(entry.description, "Online Transfer To Chk ...8619");
        assert_eq!(entry.amount.magnitude, dec!(1695.53));
        assert_eq!(entry.balance, Some(dec!(11416.48)));
    }

    #[test]
    fn test_duplicate_leading_date_dropped() {
        let entry = parse("01/30 01/30 Online Payment 21955253083 To Pg&E -250.00").unwrap();
        assert_eq!(entry.description, "Online Payment 21955253083 To Pg&E");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let entry = parse("01/14 State  Farm   Ro 27    Sfpp -106.83").unwrap();
        assert_eq!(entry.description, "State Farm Ro 27 Sfpp");
    }

    #[test]
    fn test_fragment_without_amount_is_rejected() {
        assert!(parse("01/10 Wire Transfer Outgoing Ref").is_none());
    }

    #[test]
    fn test_amount_only_description_is_rejected() {
        assert!(parse("01/10 450.00").is_none());
    }

    #[test]
    fn test_negative_with_space_and_symbol() {
        let entry = parse("07/28 WALMART.COMWALMART.COMAR - $14.05").unwrap();
        assert_eq!(entry.amount.magnitude, dec!(14.05));
        assert!(entry.amount.explicit_negative);
    }
}
