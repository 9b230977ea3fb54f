//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::record::RecordId;

/// Domain errors represent input the forest builder refuses to process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("cycle detected in hierarchy at record: {0}")]
    CycleDetected(RecordId),

    #[error("invalid record at position {position}: {message}")]
    InvalidRecord { position: usize, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
