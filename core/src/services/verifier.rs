//! Verification state machine

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use tracing::{error, info};

use crate::errors::DomainResult;
use crate::keys::IdentityKey;
use crate::services::issuer::{FIELD_CODE, FIELD_TOKEN};
use crate::services::rate_limiter::OperationClass;
use crate::store::CodeStore;

/// Outcome of a verification attempt, evaluated in order, first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Token and code both match; the session is being retired
    Ok,
    /// No live session exists for the identity
    CodeExpire,
    /// The submitted token differs from the session token
    TokenInvalid,
    /// The token matches but the code does not
    CodeInvalid,
}

impl VerifyStatus {
    /// Caller-facing status string
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStatus::Ok => "ok",
            VerifyStatus::CodeExpire => "code_expire",
            VerifyStatus::TokenInvalid => "token_invalid",
            VerifyStatus::CodeInvalid => "code_invalid",
        }
    }
}

/// Validates submitted (token, code) pairs against the stored session
pub struct Verifier<S: CodeStore> {
    store: Arc<S>,
}

impl<S: CodeStore> Verifier<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Run the verification state machine for one submission.
    ///
    /// On success the session and both rate counters are deleted by a
    /// detached best-effort task: `Ok` may be returned before the deletes
    /// land, and callers must not rely on immediate counter-reset
    /// visibility. Store read failures propagate as `Err`; the transport
    /// layer reports them as a system error.
    pub async fn verify(
        &self,
        identity: IdentityKey<'_>,
        token: &str,
        code: &str,
    ) -> DomainResult<VerifyStatus> {
        let session_key = identity.session_key();

        if !self.store.exists(&session_key).await? {
            return Ok(VerifyStatus::CodeExpire);
        }
        let session = self.store.hash_get_all(&session_key).await?;
        if session.is_empty() {
            // the session expired between the two reads
            return Ok(VerifyStatus::CodeExpire);
        }

        let stored_token = session.get(FIELD_TOKEN).map(String::as_str).unwrap_or("");
        if !codes_match(stored_token, token) {
            return Ok(VerifyStatus::TokenInvalid);
        }
        let stored_code = session.get(FIELD_CODE).map(String::as_str).unwrap_or("");
        if !codes_match(stored_code, code) {
            return Ok(VerifyStatus::CodeInvalid);
        }

        info!(session = %session_key, "verification passed, retiring session");
        self.spawn_cleanup(identity, session_key);
        Ok(VerifyStatus::Ok)
    }

    /// Delete the session and both rate counters without blocking the
    /// caller. The verification already succeeded, so a failed delete is
    /// logged and never reported; the keys still expire on their own TTL.
    fn spawn_cleanup(&self, identity: IdentityKey<'_>, session_key: String) {
        let keys = vec![
            session_key,
            identity.counter_key(OperationClass::Send),
            identity.counter_key(OperationClass::Verify),
        ];
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.delete(&keys).await {
                error!(error = %e, "failed to clean up verified session state");
            }
        });
    }
}

/// Constant-time comparison of a stored and a submitted value
fn codes_match(stored: &str, submitted: &str) -> bool {
    if stored.len() != submitted.len() {
        return false;
    }
    constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
