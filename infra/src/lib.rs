//! # SmsVerify Infrastructure
//!
//! Concrete adapters behind the core's seams: the Redis-backed
//! [`sv_core::CodeStore`] implementation and the SMS delivery backends.

pub mod cache;
pub mod sms;

// Re-export commonly used types for convenience
pub use cache::RedisStore;
pub use sms::{create_notifier, GatewaySmsNotifier, MockSmsNotifier};
