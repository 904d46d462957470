//! Customer service facade
//!
//! Thin pass-through over the repository; the demo and tests call this
//! surface rather than the repository directly. Transaction boundaries are
//! the caller's responsibility (the chained coordinator's, in practice).

use polystore_core::model::Customer;
use polystore_core::Result;

use crate::db::RelationalStore;
use crate::repo::CustomerRepo;

pub struct CustomerService {
    store: RelationalStore,
}

impl CustomerService {
    pub fn new(store: &RelationalStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    pub fn save(&self, customer: &Customer) -> Result<Customer> {
        let conn = self.store.connection();
        let conn = conn.lock().expect("connection lock poisoned");
        CustomerRepo::save(&conn, customer)
    }

    pub fn find_all(&self) -> Result<Vec<Customer>> {
        let conn = self.store.connection();
        let conn = conn.lock().expect("connection lock poisoned");
        CustomerRepo::find_all(&conn)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let conn = self.store.connection();
        let conn = conn.lock().expect("connection lock poisoned");
        CustomerRepo::find_by_id(&conn, id)
    }

    pub fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Customer>> {
        let conn = self.store.connection();
        let conn = conn.lock().expect("connection lock poisoned");
        CustomerRepo::find_by_last_name(&conn, last_name)
    }

    pub fn delete_all(&self) -> Result<()> {
        let conn = self.store.connection();
        let conn = conn.lock().expect("connection lock poisoned");
        CustomerRepo::delete_all(&conn)
    }
}
