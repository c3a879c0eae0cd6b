//! Tests for the verification services


mod rate_limiter_tests;
