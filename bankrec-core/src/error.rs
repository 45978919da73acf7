use thiserror::Error;

/// Failures that abort extraction for a whole statement. Everything softer
/// (an unparsable fragment, an unattributable transaction) degrades to a
/// logged drop or a flagged entry instead of an error.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no account summary found in statement '{statement}'")]
    NoAccountSummary { statement: String },

    #[error("page {page}: account summary present but identity unresolvable")]
    AmbiguousAccount { page: usize },

    #[error("statement '{statement}' has no pages")]
    EmptyStatement { statement: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
