//! # Storage Adapters
//!
//! Concrete `DocumentGateway` implementations: an in-memory store for
//! tests and ephemeral runs, and a local JSON-file store for everything
//! the seed tool provisions.

pub mod local;
pub mod memory;

pub use local::JsonDocStore;
pub use memory::MemoryStore;
