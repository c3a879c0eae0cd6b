//! Key-value store abstraction
//!
//! The verification core's only persistent dependency. Implementations wrap
//! an external store that provides atomic counters and hashes with expiry;
//! the rate limiter and verifier are correct exactly to the extent that
//! `incr` and the hash operations are atomic per key.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a [`CodeStore`] implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not reach the store
    #[error("store connection failed: {message}")]
    Connection { message: String },

    /// The store did not answer within the configured bound
    #[error("store operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The store answered with an error
    #[error("store command failed: {message}")]
    Command { message: String },
}

/// Atomic counter and hash primitives required by the verification core
#[async_trait]
pub trait CodeStore: Send + Sync + 'static {
    /// Atomically increment the integer at `key` and return the
    /// post-increment value. Creates the key at 1 if it is absent, with no
    /// expiry.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Set the time-to-live of an existing key.
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Remaining time-to-live in seconds. `None` when the key has no expiry
    /// set (or does not exist).
    async fn ttl(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Write `fields` into the hash at `key`, then set its time-to-live.
    async fn hash_set_with_expiry(
        &self,
        key: &str,
        fields: &[(&str, &str)],
        ttl_secs: u64,
    ) -> Result<(), StoreError>;

    /// Read all fields of the hash at `key`. An empty map means the key does
    /// not exist.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Whether `key` currently exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Delete the given keys. Missing keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<(), StoreError>;
}
