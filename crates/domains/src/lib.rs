//! # domains
//!
//! Entities, value types, the error taxonomy and the port traits of the
//! PetHub adoption backend. Nothing in this crate performs I/O; adapters
//! implement the ports and services orchestrate them.

pub mod authorization;
pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use authorization::*;
pub use errors::*;
pub use models::*;
pub use ports::*;
