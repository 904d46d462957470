//! Person repository
//!
//! Maps [`Person`] to nodes labeled `Person` with `name` and `created_at`
//! properties. Queries go through the store's effective view, so inside a
//! transaction they see staged writes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use polystore_core::model::Person;
use polystore_core::{PsError, PsErrorKind, Result};

use crate::store::{GraphStore, Node};

pub const PERSON_LABEL: &str = "Person";

pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person or replace an existing one; returns the saved
    /// person with its node id populated.
    pub fn save(store: &GraphStore, person: &Person) -> Result<Person> {
        let properties = person_properties(person);
        match person.id {
            None => {
                let node = store.create_node(PERSON_LABEL, properties)?;
                Ok(Person {
                    id: Some(node.id),
                    ..person.clone()
                })
            }
            Some(id) => {
                store.put_node(&Node {
                    id,
                    label: PERSON_LABEL.to_string(),
                    properties,
                })?;
                Ok(person.clone())
            }
        }
    }

    pub fn find_all(store: &GraphStore) -> Result<Vec<Person>> {
        store
            .nodes_with_label(PERSON_LABEL)?
            .iter()
            .map(node_to_person)
            .collect()
    }

    pub fn find_by_id(store: &GraphStore, id: u64) -> Result<Option<Person>> {
        match store.node_by_id(id)? {
            Some(node) if node.label == PERSON_LABEL => node_to_person(&node).map(Some),
            _ => Ok(None),
        }
    }

    pub fn find_by_name(store: &GraphStore, name: &str) -> Result<Vec<Person>> {
        store
            .find_by_property(PERSON_LABEL, "name", &serde_json::json!(name))?
            .iter()
            .map(node_to_person)
            .collect()
    }

    pub fn delete_all(store: &GraphStore) -> Result<()> {
        store.delete_all(PERSON_LABEL)
    }

    pub fn count(store: &GraphStore) -> Result<usize> {
        store.count(PERSON_LABEL)
    }
}

fn person_properties(person: &Person) -> BTreeMap<String, serde_json::Value> {
    let mut properties = BTreeMap::new();
    properties.insert("name".to_string(), serde_json::json!(person.name));
    properties.insert(
        "created_at".to_string(),
        serde_json::json!(person.created_at.to_rfc3339()),
    );
    properties
}

fn node_to_person(node: &Node) -> Result<Person> {
    let name = node
        .properties
        .get("name")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| malformed(node.id, "name"))?;
    let created_at = node
        .properties
        .get("created_at")
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| malformed(node.id, "created_at"))?;
    Ok(Person {
        id: Some(node.id),
        name: name.to_string(),
        created_at,
    })
}

fn malformed(id: u64, property: &str) -> PsError {
    PsError::new(PsErrorKind::Persistence)
        .with_op("read_person")
        .with_resource("graph")
        .with_message(format!("node {} has no usable '{}' property", id, property))
}
