//! Embedded schema migrations
//!
//! Migrations ship inside the binary and are applied idempotently at store
//! open, with SHA-256 checksums recorded so a changed migration body is
//! detected instead of silently re-shaping the schema.

pub mod checksums;
pub mod embedded;
pub mod runner;

pub use runner::apply_migrations;
