//! Person service facade
//!
//! Thin pass-through over the repository; the demo and tests call this
//! surface rather than the repository directly. Transaction boundaries are
//! the caller's responsibility (the chained coordinator's, in practice).

use polystore_core::model::Person;
use polystore_core::Result;

use crate::repo::PersonRepo;
use crate::store::GraphStore;

pub struct PersonService {
    store: GraphStore,
}

impl PersonService {
    pub fn new(store: &GraphStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    pub fn save(&self, person: &Person) -> Result<Person> {
        PersonRepo::save(&self.store, person)
    }

    pub fn find_all(&self) -> Result<Vec<Person>> {
        PersonRepo::find_all(&self.store)
    }

    pub fn find_by_id(&self, id: u64) -> Result<Option<Person>> {
        PersonRepo::find_by_id(&self.store, id)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Vec<Person>> {
        PersonRepo::find_by_name(&self.store, name)
    }

    pub fn delete_all(&self) -> Result<()> {
        PersonRepo::delete_all(&self.store)
    }
}
