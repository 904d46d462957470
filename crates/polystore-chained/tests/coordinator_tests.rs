//! Coordinator integration tests
//!
//! Uses a scripted in-memory resource manager to drive every begin/commit/
//! rollback path of the chained coordinator without a real store.

use std::cell::Cell;

use polystore_chained::{ChainedTransaction, ResourceManager, TxState, TxStatus};
use polystore_core::{PsError, PsErrorKind, Result};

/// Scripted resource: native calls succeed unless told to fail
struct ScriptedResource {
    state: TxState,
    fail_begin: Cell<bool>,
    fail_commit: Cell<bool>,
    rollback_calls: Cell<u32>,
}

impl ScriptedResource {
    fn new(name: &str) -> Self {
        Self {
            state: TxState::new(name),
            fail_begin: Cell::new(false),
            fail_commit: Cell::new(false),
            rollback_calls: Cell::new(0),
        }
    }

    fn failing_begin(name: &str) -> Self {
        let resource = Self::new(name);
        resource.fail_begin.set(true);
        resource
    }

    fn failing_commit(name: &str) -> Self {
        let resource = Self::new(name);
        resource.fail_commit.set(true);
        resource
    }
}

impl ResourceManager for ScriptedResource {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn status(&self) -> TxStatus {
        self.state.status()
    }

    fn begin(&self) -> Result<()> {
        self.state.begin()?;
        if self.fail_begin.get() {
            self.state.mark_not_started();
            return Err(PsError::new(PsErrorKind::Connection)
                .with_op("begin")
                .with_resource(self.name().to_string())
                .with_message("scripted begin failure"));
        }
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.state.precheck_commit()?;
        if self.fail_commit.get() {
            self.state.mark_failed();
            return Err(PsError::new(PsErrorKind::Commit)
                .with_op("commit")
                .with_resource(self.name().to_string())
                .with_message("scripted commit rejection"));
        }
        self.state.mark_committed();
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        if let polystore_chained::RollbackPath::Proceed = self.state.precheck_rollback()? {
            self.rollback_calls.set(self.rollback_calls.get() + 1);
            self.state.mark_rolled_back();
        }
        Ok(())
    }
}

#[test]
fn test_all_commit_returns_unit_result() {
    // Scenario: both resources commit; the coordinator returns the unit of
    // work's result and every transaction ends COMMITTED.
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::new("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let value = chain.run(|| Ok(42)).unwrap();

    assert_eq!(value, 42);
    assert_eq!(relational.status(), TxStatus::Committed);
    assert_eq!(graph.status(), TxStatus::Committed);
}

#[test]
fn test_begin_failure_rolls_back_earlier_resources() {
    // Scenario: resource 2 fails to begin; resource 1 must be ROLLED_BACK
    // before the coordinator call returns.
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::failing_begin("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let err = chain.run(|| Ok(())).unwrap_err();

    assert_eq!(err.kind(), PsErrorKind::Connection);
    assert_eq!(relational.status(), TxStatus::RolledBack);
    assert_eq!(graph.status(), TxStatus::NotStarted);
}

#[test]
fn test_unit_error_rolls_back_everything_begun() {
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::new("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let err = chain
        .run(|| -> Result<()> {
            Err(PsError::new(PsErrorKind::InvalidInput)
                .with_op("unit_of_work")
                .with_message("caller raised"))
        })
        .unwrap_err();

    // Original error propagates, not a rollback artifact
    assert_eq!(err.kind(), PsErrorKind::InvalidInput);
    assert_eq!(relational.status(), TxStatus::RolledBack);
    assert_eq!(graph.status(), TxStatus::RolledBack);
}

#[test]
fn test_partial_commit_reported_with_statuses() {
    // Scenario: resource 1 commits, resource 2 rejects its commit. The
    // partial-commit error must name resource 1 COMMITTED and resource 2
    // FAILED, as observed at the moment of the rejection.
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::failing_commit("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let err = chain.run(|| Ok(())).unwrap_err();

    assert_eq!(err.kind(), PsErrorKind::PartialCommit);
    assert_eq!(err.resource(), Some("graph"));

    let statuses = err.statuses().expect("partial commit carries a report");
    assert_eq!(
        statuses[0],
        ("relational".to_string(), "COMMITTED".to_string())
    );
    assert_eq!(statuses[1], ("graph".to_string(), "FAILED".to_string()));

    // The compensating rollback still ran after the report was taken
    assert_eq!(graph.status(), TxStatus::RolledBack);

    // The underlying commit rejection is preserved as the source
    let source = err.source_error().expect("commit error preserved");
    assert_eq!(source.kind(), PsErrorKind::Commit);
}

#[test]
fn test_first_commit_failure_is_plain_commit_error() {
    // Nothing committed yet, so the stores stay consistent: no partial
    // commit is reported, the commit error itself propagates.
    let relational = ScriptedResource::failing_commit("relational");
    let graph = ScriptedResource::new("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let err = chain.run(|| Ok(())).unwrap_err();

    assert_eq!(err.kind(), PsErrorKind::Commit);
    assert_eq!(relational.status(), TxStatus::RolledBack);
    assert_eq!(graph.status(), TxStatus::RolledBack);
}

#[test]
fn test_no_resource_left_active_on_any_path() {
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::failing_commit("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let _ = chain.run(|| Ok(()));

    for (_, status) in chain.status_report() {
        assert_ne!(status, "ACTIVE");
    }
}

#[test]
fn test_rollback_called_once_per_resource() {
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::new("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    let _ = chain.run(|| -> Result<()> {
        Err(PsError::new(PsErrorKind::Internal).with_message("boom"))
    });

    assert_eq!(relational.rollback_calls.get(), 1);
    assert_eq!(graph.rollback_calls.get(), 1);
}

#[test]
fn test_manager_reusable_for_next_unit_of_work() {
    // A long-lived manager resets when the next unit begins.
    let relational = ScriptedResource::new("relational");
    let graph = ScriptedResource::new("graph");
    let chain = ChainedTransaction::new()
        .register(&relational)
        .register(&graph);

    chain.run(|| Ok(())).unwrap();
    chain.run(|| Ok(())).unwrap();

    assert_eq!(relational.status(), TxStatus::Committed);
    assert_eq!(graph.status(), TxStatus::Committed);
}
