use std::io;

use thiserror::Error;

use crate::types::TableName;

/// Error type for configuration, store transport, and record-source failures.
///
/// Not-found is deliberately absent: point lookups return `Option` and prefix
/// scans return an empty sequence, so callers never special-case a missing row
/// as a failure.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("store operation on table '{table}' failed: {reason}")]
    Store { table: TableName, reason: String },
    #[error("record source failure: {0}")]
    Source(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AccessError {
    /// Build a store transport error for `table`.
    pub fn store(table: impl Into<TableName>, reason: impl Into<String>) -> Self {
        AccessError::Store {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
