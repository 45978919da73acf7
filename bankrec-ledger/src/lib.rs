//! bankrec-ledger: persisted monthly transaction records and report
//! rendering for reconciliation results.

pub mod report;
pub mod store;

pub use store::{read_rows, LedgerRow, LedgerStore, WriteMode, STATUS_NEW};
