//! Domain model shared by both stores
//!
//! The demo persists the same logical person twice: as a [`Customer`] row in
//! the relational store and as a [`Person`] node in the graph store. The
//! correlation between the two is the name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer - relational resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Row id assigned by the store on first save (None before save)
    pub id: Option<i64>,

    pub first_name: String,

    pub last_name: String,

    /// Timestamp when this customer was first saved
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Create an unsaved customer
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: Utc::now(),
        }
    }

    /// Full name, the correlation key with the graph store
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Person - graph resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Node id assigned by the store on first save (None before save)
    pub id: Option<u64>,

    pub name: String,

    /// Timestamp when this person was first saved
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// Create an unsaved person
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_has_no_id() {
        let customer = Customer::new("Jack", "Bauer");
        assert!(customer.id.is_none());
        assert_eq!(customer.full_name(), "Jack Bauer");
    }

    #[test]
    fn test_new_person_has_no_id() {
        let person = Person::new("Jack Bauer");
        assert!(person.id.is_none());
        assert_eq!(person.name, "Jack Bauer");
    }
}
