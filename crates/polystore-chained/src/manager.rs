//! Resource transaction manager capability
//!
//! One implementation per backing store. The chained coordinator is generic
//! over this trait and does not know concrete store kinds.

use polystore_core::Result;

use crate::status::TxStatus;

/// Begin/commit/rollback lifecycle for one backing store
///
/// Implementations own all native transaction calls for their store; no
/// other component issues begin/commit/rollback directly. State rules:
///
/// - `begin` fails if a transaction is already ACTIVE on the same handle.
/// - `commit` requires ACTIVE; transitions to COMMITTED, or to FAILED with
///   a commit error when the native store rejects it.
/// - `rollback` requires ACTIVE or FAILED; idempotent past the first
///   successful rollback and never raises for an already-rolled-back
///   transaction.
pub trait ResourceManager {
    /// Stable resource name used in status reports ("relational", "graph")
    fn name(&self) -> &str;

    /// Status of the transaction in the current unit of work
    fn status(&self) -> TxStatus;

    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;
}
