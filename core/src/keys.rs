//! Identity-scoped key composition
//!
//! All rate-limit and session state is scoped to one (phone, template code)
//! pair. Keys are composed deterministically under a fixed namespace so that
//! every component, including the deferred cleanup task, addresses the same
//! state.

use crate::services::rate_limiter::OperationClass;

/// Fixed namespace prefix for every key the service owns
pub const KEY_NAMESPACE: &str = "sms_verify";

/// The (phone number, template code) pair all state is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityKey<'a> {
    /// Phone number, already validated by the transport layer
    pub phone: &'a str,
    /// Opaque message template identifier
    pub template_code: &'a str,
}

impl<'a> IdentityKey<'a> {
    pub fn new(phone: &'a str, template_code: &'a str) -> Self {
        Self {
            phone,
            template_code,
        }
    }

    /// Counter key for one operation class
    pub fn counter_key(&self, class: OperationClass) -> String {
        format!(
            "{}:{}_limit:{}:{}",
            KEY_NAMESPACE,
            class.as_str(),
            self.phone,
            self.template_code
        )
    }

    /// Session hash key holding the live {code, token} pair
    pub fn session_key(&self) -> String {
        format!("{}:session:{}:{}", KEY_NAMESPACE, self.phone, self.template_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_composition() {
        let identity = IdentityKey::new("13812345678", "SMS_001");
        assert_eq!(
            identity.counter_key(OperationClass::Send),
            "sms_verify:send_limit:13812345678:SMS_001"
        );
        assert_eq!(
            identity.counter_key(OperationClass::Verify),
            "sms_verify:verify_limit:13812345678:SMS_001"
        );
        assert_eq!(
            identity.session_key(),
            "sms_verify:session:13812345678:SMS_001"
        );
    }

    #[test]
    fn test_distinct_identities_use_distinct_keys() {
        let a = IdentityKey::new("13812345678", "SMS_001");
        let b = IdentityKey::new("13812345678", "SMS_002");
        let c = IdentityKey::new("13900000000", "SMS_001");
        assert_ne!(a.session_key(), b.session_key());
        assert_ne!(a.session_key(), c.session_key());
        assert_ne!(
            a.counter_key(OperationClass::Send),
            a.counter_key(OperationClass::Verify)
        );
    }
}
