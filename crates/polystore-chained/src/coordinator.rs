//! Chained transaction coordinator
//!
//! Presents N resource transaction managers as one logical transaction
//! boundary. Begin order is registration order; rollback order is the
//! reverse. The chain is best-effort, not a protocol-level atomic commit:
//! once a resource has committed it can only be compensated, not undone.

use polystore_core::{PsError, PsErrorKind, Result};

use crate::manager::ResourceManager;
use crate::status::TxStatus;

/// Ordered composition of resource transaction managers
///
/// The caller supplies the unit of work as a closure and only sees the
/// logical boundary; individual resource transactions are never exposed.
/// Each invocation of [`run`](Self::run) is one logical unit of work and
/// must complete on a single logical thread of control.
pub struct ChainedTransaction<'a> {
    resources: Vec<&'a dyn ResourceManager>,
}

impl<'a> ChainedTransaction<'a> {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Register a resource; begin order is registration order
    #[must_use]
    pub fn register(mut self, resource: &'a dyn ResourceManager) -> Self {
        self.resources.push(resource);
        self
    }

    /// Run a unit of work inside one chained transaction
    ///
    /// 1. Begin every resource in registration order; a begin failure at
    ///    resource *k* rolls back resources *k-1..1* before returning.
    /// 2. Invoke the unit of work.
    /// 3. On normal return, commit in begin order. A commit failure after
    ///    earlier commits surfaces a partial-commit error naming every
    ///    resource's status at the moment of failure (committed resources
    ///    COMMITTED, the rejected one FAILED).
    /// 4. On an error from the unit of work, roll back everything begun in
    ///    reverse order, then propagate the original error.
    ///
    /// No resource is left ACTIVE on any return path.
    pub fn run<T>(&self, unit: impl FnOnce() -> Result<T>) -> Result<T> {
        for (index, resource) in self.resources.iter().enumerate() {
            if let Err(begin_err) = resource.begin() {
                tracing::warn!(
                    resource = resource.name(),
                    error = %begin_err,
                    "chained begin failed, rolling back earlier resources"
                );
                self.rollback_best_effort(index);
                return Err(begin_err);
            }
        }

        let value = match unit() {
            Ok(value) => value,
            Err(unit_err) => {
                self.rollback_best_effort(self.resources.len());
                return Err(unit_err);
            }
        };

        for (index, resource) in self.resources.iter().enumerate() {
            if let Err(commit_err) = resource.commit() {
                // Snapshot statuses before compensation: the report must
                // name the failed resource FAILED, not its state after the
                // compensating rollback below.
                let report = self.status_report();
                // Resources before `index` are already committed and cannot
                // be atomically undone; everything from `index` on gets a
                // compensating rollback.
                self.rollback_best_effort(self.resources.len());
                if index > 0 {
                    return Err(self.partial_commit_error(resource.name(), report, commit_err));
                }
                return Err(commit_err);
            }
        }

        Ok(value)
    }

    /// Status of every registered resource, in begin order
    pub fn status_report(&self) -> Vec<(String, String)> {
        self.resources
            .iter()
            .map(|r| (r.name().to_string(), r.status().as_str().to_string()))
            .collect()
    }

    /// Roll back resources `count-1..0` in reverse begin order, best-effort
    ///
    /// Only resources whose transaction reached ACTIVE (or FAILED after a
    /// rejected commit) are touched. Rollback failures are logged and never
    /// mask the primary error.
    fn rollback_best_effort(&self, count: usize) {
        for resource in self.resources[..count].iter().rev() {
            match resource.status() {
                TxStatus::Active | TxStatus::Failed => {
                    if let Err(rollback_err) = resource.rollback() {
                        tracing::warn!(
                            resource = resource.name(),
                            error = %rollback_err,
                            "compensating rollback failed; manual reconciliation required"
                        );
                    }
                }
                // Never begun, already terminal: nothing to undo.
                TxStatus::NotStarted | TxStatus::Committed | TxStatus::RolledBack => {}
            }
        }
    }

    fn partial_commit_error(
        &self,
        failed_resource: &str,
        report: Vec<(String, String)>,
        commit_err: PsError,
    ) -> PsError {
        tracing::error!(
            resource = failed_resource,
            report = ?report,
            "partial commit: stores are logically inconsistent"
        );
        PsError::new(PsErrorKind::PartialCommit)
            .with_op("chained_commit")
            .with_resource(failed_resource)
            .with_message("commit failed after earlier resources already committed")
            .with_statuses(report)
            .with_source(commit_err)
    }
}

impl Default for ChainedTransaction<'_> {
    fn default() -> Self {
        Self::new()
    }
}
