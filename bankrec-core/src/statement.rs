//! Statement, page, and period types.

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One page of extracted statement text, in document order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub index: usize,
    pub text: String,
}

/// The nominal period a statement covers. Transaction rows carry MM/DD
/// only, so the period is what anchors them to a year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StatementPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole calendar month, e.g. `2025-02` -> Feb 1 through Feb 28.
    pub fn from_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    /// Derive the period from a statement filename of the form
    /// `YYYYMMDD-statements-…` where the date is the closing date.
    pub fn from_statement_filename(name: &str) -> Option<Self> {
        let re = Regex::new(r"^(\d{4})(\d{2})(\d{2})-statements").ok()?;
        let caps = re.captures(name)?;
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        let end = NaiveDate::from_ymd_opt(year, month, day)?;
        let start = end.checked_sub_months(Months::new(1))?.succ_opt()?;
        Some(Self { start, end })
    }

    /// A row month later than the closing month belongs to the previous
    /// year (December activity on a January statement).
    pub fn infer_year(&self, month: u32) -> i32 {
        if month > self.end.month() {
            self.end.year() - 1
        } else {
            self.end.year()
        }
    }

    /// Resolve an MM/DD row date against this period.
    pub fn date_for(&self, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.infer_year(month), month, day)
    }

    /// Ledger label, keyed on the closing month: `2025-02`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.end.year(), self.end.month())
    }
}

/// One source document: ordered page text plus period metadata.
/// Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    pub institution: String,
    pub period: StatementPeriod,
    pub pages: Vec<Page>,
}

impl Statement {
    pub fn new(institution: impl Into<String>, period: StatementPeriod, pages: Vec<Page>) -> Self {
        Self {
            institution: institution.into(),
            period,
            pages,
        }
    }

    /// Build from a single text blob with form-feed page separators,
    /// the shape pdf-to-text tools produce.
    pub fn from_text(institution: impl Into<String>, period: StatementPeriod, text: &str) -> Self {
        let pages = text
            .split('\x0c')
            .enumerate()
            .map(|(index, text)| Page {
                index,
                text: text.to_string(),
            })
            .collect();
        Self {
            institution: institution.into(),
            period,
            pages,
        }
    }
}
