//! Graph store connection factory
//!
//! [`GraphStore::open`] is the single entry point: it logs the effective
//! configuration, then selects the backend from the descriptor's scheme.
//! Backend selection happens exactly once; everything downstream talks to
//! the same handle regardless of which driver is behind it.

use std::collections::BTreeMap;

use polystore_core::config::{ConnectionDescriptor, Scheme};
use polystore_core::Result;
use serde::{Deserialize, Serialize};

pub mod embedded;
pub mod remote;

pub use embedded::EmbeddedGraph;
pub use remote::RemoteGraph;

/// A labeled property node, the embedded store's unit of persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    pub label: String,
    pub properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone)]
enum Backend {
    Embedded(EmbeddedGraph),
    Remote(RemoteGraph),
}

/// Handle to the graph store, whichever backend the descriptor selected
#[derive(Clone)]
pub struct GraphStore {
    backend: Backend,
}

impl GraphStore {
    /// Open the store the descriptor describes
    ///
    /// Embedded: ensures the storage directory exists (idempotent) and loads
    /// any prior node log. Remote: connects, and when verify-on-connect is
    /// set runs the protocol handshake so a dead endpoint fails here rather
    /// than at first use.
    pub fn open(descriptor: &ConnectionDescriptor) -> Result<Self> {
        descriptor.log_effective_config();
        let backend = match descriptor.scheme {
            Scheme::Embedded => {
                tracing::info!(
                    storage_dir = %descriptor.storage_dir.display(),
                    "opening embedded graph store"
                );
                Backend::Embedded(EmbeddedGraph::open(&descriptor.storage_dir)?)
            }
            Scheme::RemoteProtocol => {
                tracing::info!(
                    uri = descriptor.uri.as_deref().unwrap_or("<none>"),
                    "connecting remote graph store"
                );
                Backend::Remote(RemoteGraph::connect(descriptor)?)
            }
        };
        Ok(Self { backend })
    }

    /// Open an embedded store directly, bypassing descriptor resolution
    pub fn open_embedded(storage_dir: &std::path::Path) -> Result<Self> {
        Ok(Self {
            backend: Backend::Embedded(EmbeddedGraph::open(storage_dir)?),
        })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.backend, Backend::Embedded(_))
    }

    // Data plane

    /// Create a node; the id is assigned immediately, even inside a
    /// transaction that later rolls back (ids are never reused).
    pub fn create_node(
        &self,
        label: &str,
        properties: BTreeMap<String, serde_json::Value>,
    ) -> Result<Node> {
        match &self.backend {
            Backend::Embedded(g) => g.create_node(label, properties),
            Backend::Remote(g) => g.create_node(label, properties),
        }
    }

    /// Replace an existing node wholesale
    pub fn put_node(&self, node: &Node) -> Result<()> {
        match &self.backend {
            Backend::Embedded(g) => g.put_node(node),
            Backend::Remote(g) => g.put_node(node),
        }
    }

    pub fn node_by_id(&self, id: u64) -> Result<Option<Node>> {
        match &self.backend {
            Backend::Embedded(g) => g.node_by_id(id),
            Backend::Remote(g) => g.node_by_id(id),
        }
    }

    /// All nodes carrying the label, in id order
    pub fn nodes_with_label(&self, label: &str) -> Result<Vec<Node>> {
        match &self.backend {
            Backend::Embedded(g) => g.nodes_with_label(label),
            Backend::Remote(g) => g.nodes_with_label(label),
        }
    }

    /// Nodes with the label whose property equals the value
    pub fn find_by_property(
        &self,
        label: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<Node>> {
        match &self.backend {
            Backend::Embedded(g) => g.find_by_property(label, key, value),
            Backend::Remote(g) => g.find_by_property(label, key, value),
        }
    }

    pub fn delete_all(&self, label: &str) -> Result<()> {
        match &self.backend {
            Backend::Embedded(g) => g.delete_all(label),
            Backend::Remote(g) => g.delete_all(label),
        }
    }

    pub fn count(&self, label: &str) -> Result<usize> {
        Ok(self.nodes_with_label(label)?.len())
    }

    // Transaction plane, driven by the resource manager

    pub(crate) fn begin_tx(&self) -> Result<()> {
        match &self.backend {
            Backend::Embedded(g) => g.begin_tx(),
            Backend::Remote(g) => g.begin_tx(),
        }
    }

    pub(crate) fn commit_tx(&self) -> Result<()> {
        match &self.backend {
            Backend::Embedded(g) => g.commit_tx(),
            Backend::Remote(g) => g.commit_tx(),
        }
    }

    pub(crate) fn rollback_tx(&self) -> Result<()> {
        match &self.backend {
            Backend::Embedded(g) => g.rollback_tx(),
            Backend::Remote(g) => g.rollback_tx(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polystore_core::config::{resolve, RawConfig};

    #[test]
    fn test_open_embedded_from_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let mut descriptor = resolve(&RawConfig::new()).unwrap();
        descriptor.storage_dir = dir.path().join("graphdb");

        let store = GraphStore::open(&descriptor).unwrap();
        assert!(store.is_embedded());
        assert!(descriptor.storage_dir.is_dir());

        // Opening again over the same directory is idempotent
        let again = GraphStore::open(&descriptor).unwrap();
        assert!(again.is_embedded());
    }
}
