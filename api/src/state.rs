//! Shared application state

use std::sync::Arc;

use sv_core::{CodeIssuer, CodeStore, RateLimiter, SmsNotifier, Verifier};

/// Services shared by all request handlers
pub struct AppState<S: CodeStore> {
    pub rate_limiter: Arc<RateLimiter<S>>,
    pub issuer: Arc<CodeIssuer<S>>,
    pub verifier: Arc<Verifier<S>>,
    pub notifier: Arc<dyn SmsNotifier>,
}
