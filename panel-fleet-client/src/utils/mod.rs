//! Utility modules.

/// Helpers that keep panel response bodies and secrets out of logs.
pub mod log_sanitizer;
