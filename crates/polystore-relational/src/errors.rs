//! Error helpers for the relational store
//!
//! Wraps the core PsError facility with store-specific constructors

use polystore_core::{PsError, PsErrorKind};

/// Result type alias using PsError
pub type Result<T> = std::result::Result<T, PsError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> PsError {
    PsError::new(PsErrorKind::Persistence)
        .with_op("sqlite")
        .with_resource("relational")
        .with_message(err.to_string())
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> PsError {
    PsError::new(PsErrorKind::Persistence)
        .with_op("migration")
        .with_resource("relational")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> PsError {
    PsError::new(PsErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_resource("relational")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}
