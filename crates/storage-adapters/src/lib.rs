//! # storage-adapters
//!
//! Driven adapters for the repository and media ports declared in `domains`.
//!
//! - [`memory`]: DashMap-backed store used by tests and the `memory` backend.
//! - `postgres` (feature `db-postgres`): sqlx over a PostgreSQL pool.
//! - `media_local` (feature `media-local`): content-addressed upload storage.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "media-local")]
pub mod media_local;

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;

#[cfg(feature = "media-local")]
pub use media_local::LocalMediaStore;
