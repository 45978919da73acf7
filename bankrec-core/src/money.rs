//! Decimal amount handling for statement text.
//!
//! Statement columns print amounts as `4,570.00`, `$12.00`, `-46.33`, or
//! `- 14.05` (negative sign separated from the digits). Amounts always carry
//! exactly two decimal places in the source.

use rust_decimal::Decimal;
use std::str::FromStr;

/// An amount as printed, before any category sign rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAmount {
    /// Magnitude, always non-negative
    pub magnitude: Decimal,
    /// True when the source text carried an explicit leading minus
    pub explicit_negative: bool,
}

impl ParsedAmount {
    /// The value exactly as printed: negative only when the text said so.
    /// Used for balances, which carry no category sign rule.
    pub fn printed_value(&self) -> Decimal {
        if self.explicit_negative {
            -self.magnitude
        } else {
            self.magnitude
        }
    }
}

/// Parse a printed amount. Tolerates a leading `$`, thousands separators,
/// and an explicit minus (with or without a space before the digits).
/// Sign is never inferred from anything but the text itself.
pub fn parse_amount(raw: &str) -> Option<ParsedAmount> {
    let mut s = raw.trim();

    let explicit_negative = s.starts_with('-');
    if explicit_negative {
        s = s[1..].trim_start();
    }
    s = s.strip_prefix('$').unwrap_or(s).trim_start();

    if s.is_empty() || !s.chars().next()?.is_ascii_digit() {
        return None;
    }

    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let magnitude = Decimal::from_str(&cleaned).ok()?;
    if magnitude.is_sign_negative() {
        return None;
    }

    Some(ParsedAmount {
        magnitude,
        explicit_negative,
    })
}

/// Format a signed amount as `$1,234.56` / `-$1,234.56` for reports.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part:0<2}")
}
