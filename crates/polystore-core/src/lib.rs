//! PolyStore core - shared foundation for the polyglot persistence demo
//!
//! Provides:
//! - Canonical error facility with a stable kind taxonomy
//! - Logging facility (tracing-based, profile-driven)
//! - Connection configuration resolver (embedded vs. remote-protocol)
//! - Domain model shared by the relational and graph stores

pub mod config;
pub mod errors;
pub mod logging;
pub mod model;

// Re-export key types
pub use errors::{PsError, PsErrorKind, Result};
