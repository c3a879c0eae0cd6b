//! Configuration for code issuance

/// Fallback number of code digits when misconfigured
const DEFAULT_CODE_LENGTH: usize = 6;

/// Length of the opaque session token
pub const TOKEN_LENGTH: usize = 16;

/// Session lifetime in seconds, refreshed in full on every reissue
pub const SESSION_TTL_SECONDS: u64 = 3600;

/// Configuration for the code/token issuer
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of digits in a generated code
    pub code_length: usize,
    /// Session (code, token) lifetime in seconds
    pub session_ttl_seconds: u64,
}

impl VerificationConfig {
    /// Build from a raw configured length; values <= 0 fall back to 6
    pub fn new(code_length: i64) -> Self {
        Self {
            code_length: if code_length <= 0 {
                DEFAULT_CODE_LENGTH
            } else {
                code_length as usize
            },
            session_ttl_seconds: SESSION_TTL_SECONDS,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misconfigured_length_falls_back() {
        assert_eq!(VerificationConfig::new(0).code_length, 6);
        assert_eq!(VerificationConfig::new(-3).code_length, 6);
        assert_eq!(VerificationConfig::new(4).code_length, 4);
    }
}
