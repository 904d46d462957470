//! Chained transaction coordination
//!
//! Composes independently-committable resource transaction managers into one
//! logical transaction boundary: begin in registration order, commit in the
//! same order, and on failure roll back everything that was begun, in
//! reverse order, best-effort. There is no two-phase commit across the
//! resources; a commit failure after earlier commits is surfaced as a
//! partial-commit error naming every resource's status at the failure.

pub mod coordinator;
pub mod manager;
pub mod status;

pub use coordinator::ChainedTransaction;
pub use manager::ResourceManager;
pub use status::{RollbackPath, TxState, TxStatus};
