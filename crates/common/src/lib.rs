//! uipick Common Utilities
//!
//! Shared infrastructure for all uipick crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (capture thresholds, target contract, logging)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
