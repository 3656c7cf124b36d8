//! The central domain logic and interface definitions for the forum core.

pub mod error;
pub mod models;
pub mod policy;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use policy::*;
pub use ports::*;
