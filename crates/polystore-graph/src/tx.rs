//! Graph resource transaction manager
//!
//! Drives the store's staged-write transaction from the shared resource
//! lifecycle. The status bookkeeping mirrors the relational manager so the
//! chained coordinator can report both resources uniformly.

use polystore_chained::{ResourceManager, RollbackPath, TxState, TxStatus};
use polystore_core::Result;

use crate::store::GraphStore;

/// Resource name used in chained status reports
pub const RESOURCE_NAME: &str = "graph";

pub struct GraphTxManager {
    store: GraphStore,
    state: TxState,
}

impl GraphTxManager {
    pub fn new(store: &GraphStore) -> Self {
        Self {
            store: store.clone(),
            state: TxState::new(RESOURCE_NAME),
        }
    }
}

impl ResourceManager for GraphTxManager {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn status(&self) -> TxStatus {
        self.state.status()
    }

    fn begin(&self) -> Result<()> {
        self.state.begin()?;
        if let Err(e) = self.store.begin_tx() {
            self.state.mark_not_started();
            return Err(e);
        }
        tracing::trace!(resource = RESOURCE_NAME, "transaction begun");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.state.precheck_commit()?;
        if let Err(e) = self.store.commit_tx() {
            self.state.mark_failed();
            return Err(e);
        }
        self.state.mark_committed();
        tracing::trace!(resource = RESOURCE_NAME, "transaction committed");
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        match self.state.precheck_rollback()? {
            RollbackPath::AlreadyRolledBack => Ok(()),
            RollbackPath::Proceed => {
                if let Err(e) = self.store.rollback_tx() {
                    self.state.mark_failed();
                    return Err(e);
                }
                self.state.mark_rolled_back();
                tracing::trace!(resource = RESOURCE_NAME, "transaction rolled back");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::PersonRepo;
    use polystore_core::model::Person;
    use polystore_core::PsErrorKind;

    fn open_store() -> (tempfile::TempDir, GraphStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::open_embedded(&dir.path().join("graphdb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_commit_persists_nodes() {
        let (_dir, store) = open_store();
        let manager = GraphTxManager::new(&store);

        manager.begin().unwrap();
        PersonRepo::save(&store, &Person::new("Jack Bauer")).unwrap();
        manager.commit().unwrap();

        assert_eq!(PersonRepo::count(&store).unwrap(), 1);
        assert_eq!(manager.status(), TxStatus::Committed);
    }

    #[test]
    fn test_rollback_discards_nodes() {
        let (_dir, store) = open_store();
        let manager = GraphTxManager::new(&store);

        manager.begin().unwrap();
        PersonRepo::save(&store, &Person::new("Jack Bauer")).unwrap();
        manager.rollback().unwrap();

        assert_eq!(PersonRepo::count(&store).unwrap(), 0);
        assert_eq!(manager.status(), TxStatus::RolledBack);
    }

    #[test]
    fn test_failed_commit_then_rollback_discards_writes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("graphdb");
        let store = GraphStore::open_embedded(&storage).unwrap();
        let manager = GraphTxManager::new(&store);

        manager.begin().unwrap();
        PersonRepo::save(&store, &Person::new("Jack Bauer")).unwrap();

        // Sabotage persistence so the native commit is rejected
        std::fs::remove_dir_all(&storage).unwrap();
        assert!(manager.commit().is_err());
        assert_eq!(manager.status(), TxStatus::Failed);

        // The compensating rollback the coordinator issues must win
        manager.rollback().unwrap();
        assert_eq!(manager.status(), TxStatus::RolledBack);
        assert_eq!(PersonRepo::count(&store).unwrap(), 0);
    }

    #[test]
    fn test_double_begin_rejected() {
        let (_dir, store) = open_store();
        let manager = GraphTxManager::new(&store);

        manager.begin().unwrap();
        let err = manager.begin().unwrap_err();
        assert_eq!(err.kind(), PsErrorKind::TransactionState);
        manager.rollback().unwrap();
    }

    #[test]
    fn test_rollback_twice_is_ok() {
        let (_dir, store) = open_store();
        let manager = GraphTxManager::new(&store);

        manager.begin().unwrap();
        manager.rollback().unwrap();
        manager.rollback().unwrap();
        assert_eq!(manager.status(), TxStatus::RolledBack);
    }
}
