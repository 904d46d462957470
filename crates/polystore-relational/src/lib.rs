//! Relational store - SQLite persistence for customers
//!
//! Provides:
//! - Connection management and pragmas
//! - Embedded schema migrations with checksum bookkeeping
//! - Customer repository (save, queries, delete_all)
//! - Resource transaction manager driving native SQLite transactions
//! - Customer service facade, the only surface the demo calls

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod service;
pub mod tx;

pub use db::RelationalStore;
pub use service::CustomerService;
pub use tx::RelationalTxManager;
