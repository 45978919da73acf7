//! bankrec-core: domain types and pure logic for statement extraction

pub mod classify;
pub mod config;
pub mod error;
pub mod money;
pub mod reconcile;
pub mod section;
pub mod statement;
pub mod transaction;

pub use classify::{classify, signed_amount};
pub use config::{AccountRule, Direction, ExtractConfig, PayeeRule};
pub use error::{ExtractError, Result};
pub use money::{format_usd, parse_amount, ParsedAmount};
pub use reconcile::{reconcile, reconcile_section, ReconciliationResult};
pub use section::{AccountSection, PageSlice};
pub use statement::{Page, Statement, StatementPeriod};
pub use transaction::{Category, Sign, Transaction};
