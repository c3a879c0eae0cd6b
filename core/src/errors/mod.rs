//! Domain error types
//!
//! Verification mismatches are not errors; they are ordinary outcomes of the
//! state machine and travel through [`crate::VerifyStatus`]. `DomainError`
//! covers the faults a caller must treat as a denied or failed request.

use thiserror::Error;

use crate::store::StoreError;

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by the verification core
#[derive(Error, Debug)]
pub enum DomainError {
    /// The key-value store failed or timed out. Rate-limit checks are
    /// fail-closed: callers must deny the operation on this error.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}
