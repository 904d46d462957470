//! Store assembly and chained execution
//!
//! One [`Engine`] per process: it owns the single handle to each store and
//! the service facades over them. Chained units of work construct fresh
//! resource managers per invocation, so every logical transaction starts
//! from NOT_STARTED.

use std::path::PathBuf;

use polystore_chained::ChainedTransaction;
use polystore_core::config::ConnectionDescriptor;
use polystore_core::Result;
use polystore_graph::{GraphStore, GraphTxManager, PersonService};
use polystore_relational::{CustomerService, RelationalStore, RelationalTxManager};

/// File name of the relational database, placed next to the graph storage
const RELATIONAL_DB: &str = "customers.db";

pub struct Engine {
    relational: RelationalStore,
    graph: GraphStore,
    customers: CustomerService,
    people: PersonService,
}

impl Engine {
    /// Build both stores from one resolved descriptor
    ///
    /// The graph store lives where the descriptor says; the relational
    /// database sits beside it (`var/customers.db` next to `var/graphdb`).
    pub fn open(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let graph = GraphStore::open(descriptor)?;
        let db_path = relational_db_path(descriptor);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| polystore_core::errors::io_error("create_db_dir", e))?;
        }
        tracing::info!(db_path = %db_path.display(), "opening relational store");
        let relational = RelationalStore::open(db_path)?;
        Ok(Self::from_parts(relational, graph))
    }

    /// Assemble from already-open store handles
    pub fn from_parts(relational: RelationalStore, graph: GraphStore) -> Self {
        let customers = CustomerService::new(&relational);
        let people = PersonService::new(&graph);
        Self {
            relational,
            graph,
            customers,
            people,
        }
    }

    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    pub fn people(&self) -> &PersonService {
        &self.people
    }

    pub fn relational(&self) -> &RelationalStore {
        &self.relational
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Run a unit of work spanning both stores in one chained transaction
    ///
    /// Begin order is relational first, graph second; rollback runs in
    /// reverse. The closure sees only the services, never the individual
    /// resource transactions.
    pub fn run_chained<T>(&self, unit: impl FnOnce() -> Result<T>) -> Result<T> {
        let relational_tx = RelationalTxManager::new(&self.relational);
        let graph_tx = GraphTxManager::new(&self.graph);
        ChainedTransaction::new()
            .register(&relational_tx)
            .register(&graph_tx)
            .run(unit)
    }
}

fn relational_db_path(descriptor: &ConnectionDescriptor) -> PathBuf {
    match descriptor.storage_dir.parent() {
        Some(parent) => parent.join(RELATIONAL_DB),
        None => PathBuf::from(RELATIONAL_DB),
    }
}
