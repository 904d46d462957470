//! Dual-store demo scenario
//!
//! Saves five customers and the same five people inside one chained
//! transaction, then runs the query suite against both stores and logs the
//! results. This is the end-to-end exercise of the whole stack: resolver,
//! both stores, both resource managers, and the coordinator.

use polystore_core::model::{Customer, Person};
use polystore_core::Result;

use crate::assembly::Engine;

/// The people the demo persists, in both stores, correlated by name
pub const DEMO_PEOPLE: [(&str, &str); 5] = [
    ("Jack", "Bauer"),
    ("Chloe", "O'Brian"),
    ("Kim", "Bauer"),
    ("David", "Palmer"),
    ("Michelle", "Dessler"),
];

/// Query suite results, for callers that want to render them
#[derive(Debug)]
pub struct DemoReport {
    pub customers: Vec<Customer>,
    pub people: Vec<Person>,
    pub customer_one: Option<Customer>,
    pub bauer_customers: Vec<Customer>,
    pub jack_people: Vec<Person>,
}

/// Run the demo: seed both stores in one chained transaction, then query
pub fn run(engine: &Engine) -> Result<DemoReport> {
    engine.run_chained(|| {
        for (first_name, last_name) in DEMO_PEOPLE {
            let customer = engine
                .customers()
                .save(&Customer::new(first_name, last_name))?;
            let person = engine
                .people()
                .save(&Person::new(customer.full_name()))?;
            tracing::debug!(
                customer_id = customer.id,
                person_id = person.id,
                name = %customer.full_name(),
                "saved in both stores"
            );
        }
        Ok(())
    })?;

    let customers = engine.customers().find_all()?;
    for customer in &customers {
        tracing::info!(id = customer.id, name = %customer.full_name(), "customer");
    }

    let people = engine.people().find_all()?;
    for person in &people {
        tracing::info!(id = person.id, name = %person.name, "person");
    }

    let customer_one = engine.customers().find_by_id(1)?;
    tracing::info!(found = customer_one.is_some(), "customer with id 1");

    let bauer_customers = engine.customers().find_by_last_name("Bauer")?;
    tracing::info!(count = bauer_customers.len(), "customers named Bauer");

    let jack_people = engine.people().find_by_name("Jack Bauer")?;
    tracing::info!(count = jack_people.len(), "people named Jack Bauer");

    Ok(DemoReport {
        customers,
        people,
        customer_one,
        bauer_customers,
        jack_people,
    })
}
