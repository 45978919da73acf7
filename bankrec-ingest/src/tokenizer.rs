//! Split section text into candidate transaction fragments.
//!
//! Extracted statement text is messy: an entry may wrap across several
//! physical lines, and a single physical line may carry two entries
//! concatenated. The tokenizer only decides fragment boundaries; it never
//! interprets dates or amounts beyond recognizing their shape.

use anyhow::Result;
use regex::Regex;

/// How many physical lines an entry may wrap across before we give up on
/// finding its amount.
pub const LOOKAHEAD_LINES: usize = 4;

/// A candidate transaction fragment: one date-led span of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub page: usize,
    /// 1-based number of the fragment's first physical line within the slice
    pub line: usize,
    pub text: String,
}

pub struct Tokenizer {
    date_token: Regex,
    amount_tail: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Optional third segment catches full dates (01/24/2025) so they
            // are not mistaken for row-opening MM/DD tokens
            date_token: Regex::new(r"\b(\d{1,2}/\d{1,2})(/\d{2,4})?\b")?,
            amount_tail: Regex::new(r"\d[\d,]*\.\d{2}\s*$")?,
        })
    }

    /// Split one owned slice of page text into fragments.
    pub fn tokenize(&self, page: usize, text: &str) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        let mut open: Option<(Fragment, usize)> = None; // fragment, lines absorbed

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if is_marker(line) {
                // summary/header territory closes any wrapped entry
                if let Some((frag, _)) = open.take() {
                    fragments.push(frag);
                }
                continue;
            }

            if self.leads_with_date(line) {
                if let Some((frag, _)) = open.take() {
                    // a new dated row terminates the lookahead; the previous
                    // candidate goes out as-is and the parser decides its fate
                    fragments.push(frag);
                }
                let pieces = self.split_concatenated(line);
                let last = pieces.len() - 1;
                for (i, piece) in pieces.into_iter().enumerate() {
                    let frag = Fragment {
                        page,
                        line: line_no,
                        text: piece,
                    };
                    if i < last || self.has_amount_tail(&frag.text) {
                        fragments.push(frag);
                    } else {
                        open = Some((frag, 0));
                    }
                }
            } else if let Some((mut frag, absorbed)) = open.take() {
                frag.text.push(' ');
                frag.text.push_str(line);
                let absorbed = absorbed + 1;
                if self.has_amount_tail(&frag.text) || absorbed >= LOOKAHEAD_LINES {
                    fragments.push(frag);
                } else {
                    open = Some((frag, absorbed));
                }
            }
            // lines outside any fragment (summary prose, totals) are ignored
        }

        if let Some((frag, _)) = open.take() {
            fragments.push(frag);
        }
        fragments
    }

    fn leads_with_date(&self, line: &str) -> bool {
        match self.date_token.captures(line) {
            Some(caps) => {
                let m = match caps.get(1) {
                    Some(m) => m,
                    None => return false,
                };
                m.start() == 0 && caps.get(2).is_none()
            }
            None => false,
        }
    }

    fn has_amount_tail(&self, text: &str) -> bool {
        self.amount_tail.is_match(text.trim_end())
    }

    /// Split a physical line carrying several dated entries. A date token
    /// only opens a new entry once the running text already ends in an
    /// amount: card rows embed their purchase date mid-description, and that
    /// date must stay part of the description.
    fn split_concatenated(&self, line: &str) -> Vec<String> {
        let mut cuts: Vec<usize> = Vec::new();
        for caps in self.date_token.captures_iter(line) {
            if caps.get(2).is_some() {
                continue; // full date, part of a description
            }
            let start = match caps.get(1) {
                Some(m) => m.start(),
                None => continue,
            };
            match cuts.last() {
                None => cuts.push(start),
                Some(&prev) => {
                    if start > prev && self.has_amount_tail(&line[prev..start]) {
                        cuts.push(start);
                    }
                }
            }
        }

        if cuts.is_empty() {
            return vec![line.to_string()];
        }

        let mut pieces = Vec::new();
        for (i, &cut) in cuts.iter().enumerate() {
            let end = cuts.get(i + 1).copied().unwrap_or(line.len());
            pieces.push(line[cut..end].trim().to_string());
        }
        pieces
    }
}

/// Header and summary lines that can never be fragment content.
fn is_marker(line: &str) -> bool {
    line.contains("SUMMARY")
        || line.contains("TRANSACTION DETAIL")
        || line.contains("Beginning Balance")
        || line.contains("Ending Balance")
        || (line.starts_with("DATE") && line.contains("DESCRIPTION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<Fragment> {
        Tokenizer::new().unwrap().tokenize(4, text)
    }

    #[test]
    fn test_single_line_entries() {
        let frags = tokenize(
            "01/13 Venmo Payment 1039580470057 Web ID: 3264681992 -101.29 2,769.80\n\
             01/22 Check # 998 -280.00 13,238.65\n",
        );
        assert_eq!(frags.len(), 2);
        assert!(frags[0].text.starts_with("01/13 Venmo"));
        assert_eq!(frags[0].page, 4);
        assert_eq!(frags[1].line, 2);
    }

    #[test]
    fn test_wrapped_entry_absorbs_following_lines() {
        let frags = tokenize(
            "02/06 Online Transfer To Chk ...8619\n\
             Transaction#: 23637622827 -1,695.53 11,416.48\n",
        );
        assert_eq!(frags.len(), 1);
        assert_eq!(
            frags[0].text,
            "02/06 Online Transfer To Chk ...8619 Transaction#: 23637622827 -1,695.53 11,416.48"
        );
    }

    #[test]
    fn test_new_date_line_terminates_lookahead() {
        let frags = tokenize(
            "01/10 Wire Transfer Outgoing Ref\n\
             01/11 Gas Station 40.00 1,000.00\n",
        );
        // first candidate never found its amount but is still emitted;
        // the parser drops it
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].text, "01/10 Wire Transfer Outgoing Ref");
        assert!(frags[1].text.starts_with("01/11 Gas Station"));
    }

    #[test]
    fn test_concatenated_entries_split() {
        let frags = tokenize("01/10 Coffee Shop 5.00 01/11 Gas Station 40.00\n");
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].text, "01/10 Coffee Shop 5.00");
        assert_eq!(frags[1].text, "01/11 Gas Station 40.00");
    }

    #[test]
    fn test_embedded_purchase_date_does_not_split() {
        let frags = tokenize(
            "01/27 Card Purchase 01/24 Amazon Mktpl*Zg4WI9R Amzn.Com/Bill WA Card 0885 -46.33 2,723.47\n",
        );
        assert_eq!(frags.len(), 1);
        assert!(frags[0].text.contains("01/24 Amazon"));
    }

    #[test]
    fn test_full_dates_are_not_row_openers() {
        let frags = tokenize("01/24/2025 settlement summary text\n");
        assert!(frags.is_empty());
    }

    #[test]
    fn test_markers_are_skipped_and_close_fragments() {
        let frags = tokenize(
            "CHECKING SUMMARY\n\
             Beginning Balance $2,871.09\n\
             Ending Balance $1,099.24\n\
             TRANSACTION DETAIL\n\
             DATE DESCRIPTION AMOUNT BALANCE\n\
             01/30 Online Payment 23214609657 To Discover Card -250.00 2,323.47\n",
        );
        assert_eq!(frags.len(), 1);
        assert!(frags[0].text.starts_with("01/30"));
    }

    #[test]
    fn test_lookahead_is_bounded() {
        let frags = tokenize(
            "01/10 Wire Transfer\n\
             line two\n\
             line three\n\
             line four\n\
             line five\n\
             line six\n",
        );
        // closed after four absorbed lines, trailing prose ignored
        assert_eq!(frags.len(), 1);
        assert!(frags[0].text.ends_with("line five"));
        assert!(!frags[0].text.contains("line six"));
    }
}
