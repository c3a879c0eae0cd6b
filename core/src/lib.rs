//! # SmsVerify Core
//!
//! Domain layer for the smsverify service: the key-value store seam, the
//! per-identity rate limiter, the code/token issuer, and the verification
//! state machine. All persistent state lives behind [`store::CodeStore`];
//! the core keeps no in-process mutable state, so correctness rests on the
//! store's atomicity guarantees for increments and hash writes.

pub mod errors;
pub mod keys;
pub mod notify;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use errors::{DomainError, DomainResult};
pub use keys::IdentityKey;
pub use notify::{DeliveryReceipt, NotifyError, SmsNotifier};
pub use services::config::VerificationConfig;
pub use services::issuer::{CodeIssuer, IssuedCode};
pub use services::rate_limiter::{OperationClass, RateLimiter};
pub use services::verifier::{Verifier, VerifyStatus};
pub use store::{CodeStore, StoreError};
