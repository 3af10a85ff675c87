//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Domain errors represent inventory rules that cannot be satisfied.
/// These are independent of where the data came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("inventory sheet has no '{column}' column")]
    MissingColumn { column: String },

    #[error("inventory sheet is empty (no header row)")]
    EmptySheet,

    #[error("invalid site suffix pattern '{pattern}': {message}")]
    InvalidSitePattern { pattern: String, message: String },
}
