use thiserror::Error;

/// Document-level failures. Fatal for that document only.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot decrypt document: {reason}")]
    Decryption { reason: String },
    #[error("unreadable document: {reason}")]
    Unreadable { reason: String },
}

/// A page with no extractable text layer. It contributes zero lines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("page {page} has no extractable text: {reason}")]
pub struct UnreadablePage {
    /// 1-based page number
    pub page: u32,
    pub reason: String,
}

/// Why a transaction-start line was discarded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("invalid date {token:?}, expected DD-MM-YYYY")]
    DateFormat { token: String },
    #[error("invalid {field} {token:?}")]
    NumericFormat { field: &'static str, token: String },
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
}
