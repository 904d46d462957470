//! Embedded graph backend
//!
//! A property-node store over a single JSON-lines log in the storage
//! directory. Writes inside a transaction are staged in memory and only hit
//! the log on commit; the log itself is replaced atomically (temp file then
//! rename), so a crash mid-commit leaves the previous generation intact.
//! Writes outside a transaction apply and persist immediately.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use polystore_core::errors::{from_serde_json, io_error};
use polystore_core::{PsError, PsErrorKind, Result};

use super::Node;

const NODE_LOG: &str = "nodes.jsonl";

#[derive(Debug, Clone)]
enum StagedOp {
    Put(Node),
    DeleteLabel(String),
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<u64, Node>,
    next_id: u64,
    staged: Vec<StagedOp>,
    in_tx: bool,
}

impl Inner {
    fn apply(nodes: &mut BTreeMap<u64, Node>, op: &StagedOp) {
        match op {
            StagedOp::Put(node) => {
                nodes.insert(node.id, node.clone());
            }
            StagedOp::DeleteLabel(label) => {
                nodes.retain(|_, node| node.label != *label);
            }
        }
    }

    /// Committed state with staged operations overlaid, in order
    fn effective(&self) -> BTreeMap<u64, Node> {
        let mut view = self.nodes.clone();
        for op in &self.staged {
            Self::apply(&mut view, op);
        }
        view
    }

    fn stage_or_apply(&mut self, op: StagedOp) {
        if self.in_tx {
            self.staged.push(op);
        } else {
            Self::apply(&mut self.nodes, &op);
        }
    }
}

#[derive(Clone)]
pub struct EmbeddedGraph {
    storage_dir: PathBuf,
    inner: Arc<Mutex<Inner>>,
}

impl EmbeddedGraph {
    /// Open the store at the directory, creating it if absent
    ///
    /// Creation is idempotent: an existing directory is reused as-is and its
    /// node log reloaded.
    pub fn open(storage_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(storage_dir).map_err(|e| io_error("create_storage_dir", e))?;
        let mut inner = Inner::default();
        let log_path = storage_dir.join(NODE_LOG);
        if log_path.exists() {
            let text =
                std::fs::read_to_string(&log_path).map_err(|e| io_error("read_node_log", e))?;
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                let node: Node = serde_json::from_str(line).map_err(from_serde_json)?;
                inner.next_id = inner.next_id.max(node.id + 1);
                inner.nodes.insert(node.id, node);
            }
        }
        tracing::debug!(
            storage_dir = %storage_dir.display(),
            nodes = inner.nodes.len(),
            "embedded graph opened"
        );
        Ok(Self {
            storage_dir: storage_dir.to_path_buf(),
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("graph store lock poisoned")
    }

    /// Rewrite the node log from committed state, atomically
    fn persist(&self, nodes: &BTreeMap<u64, Node>) -> Result<()> {
        let tmp_path = self.storage_dir.join(format!("{}.tmp", NODE_LOG));
        let mut buf = Vec::new();
        for node in nodes.values() {
            serde_json::to_writer(&mut buf, node).map_err(from_serde_json)?;
            buf.push(b'\n');
        }
        let mut file =
            std::fs::File::create(&tmp_path).map_err(|e| io_error("write_node_log", e))?;
        file.write_all(&buf)
            .and_then(|_| file.sync_all())
            .map_err(|e| io_error("write_node_log", e))?;
        std::fs::rename(&tmp_path, self.storage_dir.join(NODE_LOG))
            .map_err(|e| io_error("replace_node_log", e))
    }

    pub fn create_node(
        &self,
        label: &str,
        properties: BTreeMap<String, serde_json::Value>,
    ) -> Result<Node> {
        let mut inner = self.lock();
        let node = Node {
            id: inner.next_id,
            label: label.to_string(),
            properties,
        };
        inner.next_id += 1;
        inner.stage_or_apply(StagedOp::Put(node.clone()));
        if !inner.in_tx {
            self.persist(&inner.nodes)?;
        }
        Ok(node)
    }

    pub fn put_node(&self, node: &Node) -> Result<()> {
        let mut inner = self.lock();
        if !inner.effective().contains_key(&node.id) {
            return Err(PsError::new(PsErrorKind::NotFound)
                .with_op("put_node")
                .with_resource("graph")
                .with_message(format!("no node with id {}", node.id)));
        }
        inner.stage_or_apply(StagedOp::Put(node.clone()));
        if !inner.in_tx {
            self.persist(&inner.nodes)?;
        }
        Ok(())
    }

    pub fn node_by_id(&self, id: u64) -> Result<Option<Node>> {
        Ok(self.lock().effective().get(&id).cloned())
    }

    pub fn nodes_with_label(&self, label: &str) -> Result<Vec<Node>> {
        Ok(self
            .lock()
            .effective()
            .into_values()
            .filter(|node| node.label == label)
            .collect())
    }

    pub fn find_by_property(
        &self,
        label: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<Node>> {
        Ok(self
            .lock()
            .effective()
            .into_values()
            .filter(|node| node.label == label && node.properties.get(key) == Some(value))
            .collect())
    }

    pub fn delete_all(&self, label: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.stage_or_apply(StagedOp::DeleteLabel(label.to_string()));
        if !inner.in_tx {
            self.persist(&inner.nodes)?;
        }
        Ok(())
    }

    pub fn begin_tx(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.in_tx {
            return Err(PsError::new(PsErrorKind::TransactionState)
                .with_op("begin")
                .with_resource("graph")
                .with_message("a transaction is already active on this store"));
        }
        inner.in_tx = true;
        Ok(())
    }

    pub fn commit_tx(&self) -> Result<()> {
        let mut inner = self.lock();
        // Build the next generation and persist it before swapping it in.
        // A failed persist leaves committed state and the staged ops
        // untouched, so a subsequent rollback still discards them.
        let mut next = inner.nodes.clone();
        for op in &inner.staged {
            Inner::apply(&mut next, op);
        }
        self.persist(&next)?;
        inner.nodes = next;
        inner.staged.clear();
        inner.in_tx = false;
        Ok(())
    }

    pub fn rollback_tx(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.staged.clear();
        inner.in_tx = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(name: &str) -> BTreeMap<String, serde_json::Value> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), serde_json::json!(name));
        map
    }

    #[test]
    fn test_create_outside_tx_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();
        let node = graph.create_node("Person", props("Jack Bauer")).unwrap();
        assert_eq!(node.id, 0);

        // A fresh handle over the same directory sees the node
        let reopened = EmbeddedGraph::open(dir.path()).unwrap();
        assert_eq!(reopened.nodes_with_label("Person").unwrap().len(), 1);
    }

    #[test]
    fn test_staged_writes_visible_in_tx_and_gone_after_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();

        graph.begin_tx().unwrap();
        graph.create_node("Person", props("Chloe O'Brian")).unwrap();
        assert_eq!(graph.nodes_with_label("Person").unwrap().len(), 1);
        graph.rollback_tx().unwrap();

        assert_eq!(graph.nodes_with_label("Person").unwrap().len(), 0);
        let reopened = EmbeddedGraph::open(dir.path()).unwrap();
        assert_eq!(reopened.nodes_with_label("Person").unwrap().len(), 0);
    }

    #[test]
    fn test_commit_applies_staged_ops_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();

        graph.begin_tx().unwrap();
        graph.create_node("Person", props("Kim Bauer")).unwrap();
        graph.delete_all("Person").unwrap();
        graph.create_node("Person", props("David Palmer")).unwrap();
        graph.commit_tx().unwrap();

        let survivors = graph.nodes_with_label("Person").unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(
            survivors[0].properties.get("name"),
            Some(&serde_json::json!("David Palmer"))
        );
    }

    #[test]
    fn test_ids_not_reused_after_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();

        graph.begin_tx().unwrap();
        let discarded = graph.create_node("Person", props("Nina Myers")).unwrap();
        graph.rollback_tx().unwrap();

        let kept = graph.create_node("Person", props("Tony Almeida")).unwrap();
        assert!(kept.id > discarded.id);
    }

    #[test]
    fn test_failed_commit_leaves_writes_discardable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("graphdb");
        let graph = EmbeddedGraph::open(&storage).unwrap();

        graph.begin_tx().unwrap();
        graph.create_node("Person", props("Jack Bauer")).unwrap();

        // Sabotage persistence so the native commit is rejected
        std::fs::remove_dir_all(&storage).unwrap();
        assert!(graph.commit_tx().is_err());

        // Committed state is untouched and rollback discards the writes
        graph.rollback_tx().unwrap();
        assert!(graph.nodes_with_label("Person").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_property_matches_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();
        graph.create_node("Person", props("Jack Bauer")).unwrap();
        graph.create_node("Person", props("Kim Bauer")).unwrap();

        let hits = graph
            .find_by_property("Person", "name", &serde_json::json!("Jack Bauer"))
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_double_begin_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();
        graph.begin_tx().unwrap();
        let err = graph.begin_tx().unwrap_err();
        assert_eq!(err.kind(), PsErrorKind::TransactionState);
    }

    #[test]
    fn test_put_node_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let graph = EmbeddedGraph::open(dir.path()).unwrap();
        let phantom = Node {
            id: 42,
            label: "Person".into(),
            properties: props("Nobody"),
        };
        let err = graph.put_node(&phantom).unwrap_err();
        assert_eq!(err.kind(), PsErrorKind::NotFound);
    }
}
