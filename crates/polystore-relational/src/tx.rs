//! Relational resource transaction manager
//!
//! Drives native SQLite transactions on the shared connection. All
//! transactional state mutation for the relational store goes through this
//! manager; repositories only read and write rows inside the boundary it
//! establishes.

use std::sync::{Arc, Mutex};

use polystore_chained::{ResourceManager, RollbackPath, TxState, TxStatus};
use polystore_core::{PsError, PsErrorKind, Result};
use rusqlite::Connection;

use crate::db::RelationalStore;

/// Resource name used in chained status reports
pub const RESOURCE_NAME: &str = "relational";

pub struct RelationalTxManager {
    conn: Arc<Mutex<Connection>>,
    state: TxState,
}

impl RelationalTxManager {
    pub fn new(store: &RelationalStore) -> Self {
        Self {
            conn: store.connection(),
            state: TxState::new(RESOURCE_NAME),
        }
    }

    fn execute(&self, sql: &str) -> std::result::Result<(), rusqlite::Error> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        conn.execute_batch(sql)
    }
}

impl ResourceManager for RelationalTxManager {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn status(&self) -> TxStatus {
        self.state.status()
    }

    fn begin(&self) -> Result<()> {
        self.state.begin()?;
        if let Err(e) = self.execute("BEGIN IMMEDIATE") {
            self.state.mark_not_started();
            return Err(PsError::new(PsErrorKind::Connection)
                .with_op("begin")
                .with_resource(RESOURCE_NAME)
                .with_message(e.to_string()));
        }
        tracing::trace!(resource = RESOURCE_NAME, "transaction begun");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.state.precheck_commit()?;
        if let Err(e) = self.execute("COMMIT") {
            self.state.mark_failed();
            return Err(PsError::new(PsErrorKind::Commit)
                .with_op("commit")
                .with_resource(RESOURCE_NAME)
                .with_message(e.to_string()));
        }
        self.state.mark_committed();
        tracing::trace!(resource = RESOURCE_NAME, "transaction committed");
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        match self.state.precheck_rollback()? {
            RollbackPath::AlreadyRolledBack => Ok(()),
            RollbackPath::Proceed => {
                if let Err(e) = self.execute("ROLLBACK") {
                    self.state.mark_failed();
                    return Err(PsError::new(PsErrorKind::Persistence)
                        .with_op("rollback")
                        .with_resource(RESOURCE_NAME)
                        .with_message(e.to_string()));
                }
                self.state.mark_rolled_back();
                tracing::trace!(resource = RESOURCE_NAME, "transaction rolled back");
                Ok(())
            }
        }
    }
}
