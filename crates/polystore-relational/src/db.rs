//! Database connection management
//!
//! Opens and configures the process-wide SQLite handle. Exactly one
//! [`RelationalStore`] is created per process; the assembly layer passes it
//! by reference into the transaction manager and the service facade.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;

/// Process-wide relational store handle
///
/// The native driver connection sits behind a mutex; all transactional
/// state mutation goes through [`RelationalTxManager`](crate::tx::RelationalTxManager).
#[derive(Clone)]
pub struct RelationalStore {
    conn: Arc<Mutex<Connection>>,
}

impl RelationalStore {
    /// Open the store at the given path and bring the schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path).map_err(from_rusqlite)?;
        configure(&conn)?;
        apply_migrations(&mut conn)?;
        tracing::debug!("relational store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(from_rusqlite)?;
        configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shared handle to the native connection
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

/// Configure a connection with optimal settings
fn configure(conn: &Connection) -> Result<()> {
    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    Ok(())
}
