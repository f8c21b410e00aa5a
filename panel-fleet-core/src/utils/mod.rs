//! Utility modules.

pub mod datetime;
pub mod domain;
pub mod pattern;
