//! Verification code and session token issuance

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use tracing::debug;

use crate::errors::DomainResult;
use crate::keys::IdentityKey;
use crate::services::config::{VerificationConfig, TOKEN_LENGTH};
use crate::store::CodeStore;

/// Hash field holding the one-time code
pub(crate) const FIELD_CODE: &str = "code";
/// Hash field holding the session token
pub(crate) const FIELD_TOKEN: &str = "token";

/// A freshly issued (code, token) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    /// One-time numeric code of exactly the configured number of digits
    pub code: String,
    /// Opaque session token, stable across reissues while the session lives
    pub token: String,
}

/// Generates codes and tokens and persists them as the identity's session
pub struct CodeIssuer<S: CodeStore> {
    store: Arc<S>,
    config: VerificationConfig,
}

impl<S: CodeStore> CodeIssuer<S> {
    pub fn new(store: Arc<S>, config: VerificationConfig) -> Self {
        Self { store, config }
    }

    /// Issue a code for the identity, opening a session or refreshing the
    /// existing one.
    ///
    /// A live session keeps its token, so a client holding the token from an
    /// earlier send stays valid; the code is always regenerated and the
    /// session's full TTL window restarts. The initial read does not mutate,
    /// so a failure anywhere before the write leaves any prior session
    /// unchanged.
    pub async fn issue(&self, identity: IdentityKey<'_>) -> DomainResult<IssuedCode> {
        let key = identity.session_key();

        let session = self.store.hash_get_all(&key).await?;
        let token = match session.get(FIELD_TOKEN) {
            Some(existing) if !existing.is_empty() => existing.clone(),
            _ => generate_token(),
        };
        let code = generate_code(self.config.code_length);

        self.store
            .hash_set_with_expiry(
                &key,
                &[(FIELD_CODE, &code), (FIELD_TOKEN, &token)],
                self.config.session_ttl_seconds,
            )
            .await?;

        debug!(session = %key, "issued verification code");
        Ok(IssuedCode { code, token })
    }
}

/// Uniformly random decimal string of exactly `len` digits.
///
/// Digits are drawn independently from the OS CSPRNG, so leading zeros occur
/// at the same rate as any other digit and no power-of-ten arithmetic can
/// overflow for large lengths.
fn generate_code(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Random alphanumeric session token from the OS CSPRNG
fn generate_token() -> String {
    OsRng
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
