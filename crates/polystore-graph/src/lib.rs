//! Graph store - embedded or remote-protocol persistence for people
//!
//! Provides:
//! - Connection factory selecting the backend from a resolved descriptor
//! - Embedded property-graph store over a local storage directory
//! - Remote-protocol endpoint with optional verify-on-connect handshake
//! - Person repository (save, queries, delete_all)
//! - Resource transaction manager driving the embedded store's staged writes
//! - Person service facade, the only surface the demo calls

pub mod bolt;
pub mod repo;
pub mod service;
pub mod store;
pub mod tx;

pub use service::PersonService;
pub use store::GraphStore;
pub use tx::GraphTxManager;
