//! Verification services
//!
//! The three components of the core, in call order for a send request:
//! [`rate_limiter::RateLimiter`] then [`issuer::CodeIssuer`]; a verify
//! request passes the limiter (verify class) then [`verifier::Verifier`].

pub mod config;
pub mod issuer;
pub mod rate_limiter;
pub mod verifier;

#[cfg(test)]
mod tests;
