//! Resource transaction status and its state machine
//!
//! `NOT_STARTED → ACTIVE → {COMMITTED | FAILED}`, `{ACTIVE, FAILED} →
//! ROLLED_BACK`. No transition leaves `COMMITTED` or `ROLLED_BACK` within a
//! unit of work; a long-lived manager resets to `ACTIVE` on the next begin.

use std::sync::Mutex;

use polystore_core::{PsError, PsErrorKind, Result};

/// Status of one resource transaction within the current unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxStatus {
    #[default]
    NotStarted,
    Active,
    Committed,
    RolledBack,
    Failed,
}

impl TxStatus {
    /// Stable token used in operator-facing status reports
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::NotStarted => "NOT_STARTED",
            TxStatus::Active => "ACTIVE",
            TxStatus::Committed => "COMMITTED",
            TxStatus::RolledBack => "ROLLED_BACK",
            TxStatus::Failed => "FAILED",
        }
    }
}

/// Outcome of a rollback state check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackPath {
    /// Transaction is ACTIVE or FAILED; perform the native rollback
    Proceed,
    /// Already rolled back; the call is an idempotent no-op
    AlreadyRolledBack,
}

/// Shared state machine for resource transaction managers
///
/// Both store managers embed one of these so the lifecycle rules live in a
/// single place. All checks and transitions go through this type; nothing
/// else mutates the status.
#[derive(Debug)]
pub struct TxState {
    name: String,
    status: Mutex<TxStatus>,
}

impl TxState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Mutex::new(TxStatus::NotStarted),
        }
    }

    /// Resource name used in error context and status reports
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TxStatus {
        *self.status.lock().expect("tx status lock poisoned")
    }

    /// Transition into ACTIVE for a new unit of work
    ///
    /// Fails when a transaction is already ACTIVE on the same handle (no
    /// nested transactions per resource). Terminal states from a previous
    /// unit of work reset.
    pub fn begin(&self) -> Result<()> {
        let mut status = self.status.lock().expect("tx status lock poisoned");
        if *status == TxStatus::Active {
            return Err(self.state_error("begin", *status));
        }
        *status = TxStatus::Active;
        Ok(())
    }

    /// Revert to NOT_STARTED when the native begin fails
    ///
    /// A begin that never opened a native transaction must not leave the
    /// manager looking ACTIVE.
    pub fn mark_not_started(&self) {
        *self.status.lock().expect("tx status lock poisoned") = TxStatus::NotStarted;
    }

    /// Check that a commit is legal (requires ACTIVE)
    pub fn precheck_commit(&self) -> Result<()> {
        let status = self.status();
        if status != TxStatus::Active {
            return Err(self.state_error("commit", status));
        }
        Ok(())
    }

    /// Record a successful native commit
    pub fn mark_committed(&self) {
        *self.status.lock().expect("tx status lock poisoned") = TxStatus::Committed;
    }

    /// Record a native commit rejection
    pub fn mark_failed(&self) {
        *self.status.lock().expect("tx status lock poisoned") = TxStatus::Failed;
    }

    /// Check whether a rollback should run
    ///
    /// ACTIVE and FAILED proceed; ROLLED_BACK is an idempotent no-op and
    /// never raises; NOT_STARTED and COMMITTED are protocol misuse.
    pub fn precheck_rollback(&self) -> Result<RollbackPath> {
        match self.status() {
            TxStatus::Active | TxStatus::Failed => Ok(RollbackPath::Proceed),
            TxStatus::RolledBack => Ok(RollbackPath::AlreadyRolledBack),
            status @ (TxStatus::NotStarted | TxStatus::Committed) => {
                Err(self.state_error("rollback", status))
            }
        }
    }

    /// Record a successful native rollback
    pub fn mark_rolled_back(&self) {
        *self.status.lock().expect("tx status lock poisoned") = TxStatus::RolledBack;
    }

    fn state_error(&self, op: &str, status: TxStatus) -> PsError {
        PsError::new(PsErrorKind::TransactionState)
            .with_op(op)
            .with_resource(self.name.clone())
            .with_message(format!("illegal {} from state {}", op, status.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_from_not_started() {
        let state = TxState::new("relational");
        state.begin().unwrap();
        assert_eq!(state.status(), TxStatus::Active);
    }

    #[test]
    fn test_double_begin_is_state_error() {
        let state = TxState::new("relational");
        state.begin().unwrap();
        let err = state.begin().unwrap_err();
        assert_eq!(err.kind(), PsErrorKind::TransactionState);
        assert_eq!(err.resource(), Some("relational"));
    }

    #[test]
    fn test_begin_resets_after_terminal_state() {
        let state = TxState::new("graph");
        state.begin().unwrap();
        state.mark_committed();
        state.begin().unwrap();
        assert_eq!(state.status(), TxStatus::Active);
    }

    #[test]
    fn test_commit_requires_active() {
        let state = TxState::new("graph");
        let err = state.precheck_commit().unwrap_err();
        assert_eq!(err.kind(), PsErrorKind::TransactionState);
    }

    #[test]
    fn test_rollback_idempotent_past_first_success() {
        let state = TxState::new("graph");
        state.begin().unwrap();
        assert_eq!(state.precheck_rollback().unwrap(), RollbackPath::Proceed);
        state.mark_rolled_back();
        // Second call: same terminal state, no error
        assert_eq!(
            state.precheck_rollback().unwrap(),
            RollbackPath::AlreadyRolledBack
        );
        assert_eq!(state.status(), TxStatus::RolledBack);
    }

    #[test]
    fn test_rollback_allowed_from_failed() {
        let state = TxState::new("graph");
        state.begin().unwrap();
        state.mark_failed();
        assert_eq!(state.precheck_rollback().unwrap(), RollbackPath::Proceed);
    }

    #[test]
    fn test_rollback_rejected_from_not_started_and_committed() {
        let state = TxState::new("graph");
        assert!(state.precheck_rollback().is_err());
        state.begin().unwrap();
        state.mark_committed();
        assert!(state.precheck_rollback().is_err());
    }
}
