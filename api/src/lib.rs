//! # SmsVerify API
//!
//! HTTP transport layer: request/response marshalling around the
//! verification core. Handlers validate input, consult the rate limiter,
//! and map core outcomes onto the `{status, msg, data}` wire envelope.

pub mod dto;
pub mod routes;
pub mod state;
