//! Assembly layer
//!
//! Builds both store handles from one resolved descriptor, wires the
//! chained transaction coordinator over them, and hosts the dual-store
//! demo scenario. Everything is assembled explicitly and passed by
//! reference; there is no global registry.

pub mod assembly;
pub mod demo;

pub use assembly::Engine;
