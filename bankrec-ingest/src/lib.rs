//! bankrec-ingest: the statement text engine — fragment tokenizing, line
//! parsing, account segmentation, attribution, and the per-statement
//! pipeline tying them together.

pub mod attribution;
pub mod parser;
pub mod pipeline;
pub mod segmenter;
pub mod tokenizer;

pub use parser::{EntryParser, RawEntry};
pub use pipeline::{extract_statement, AccountExtraction, DroppedFragment, StatementExtraction};
pub use segmenter::{Segmentation, Segmenter};
pub use tokenizer::{Fragment, Tokenizer};
