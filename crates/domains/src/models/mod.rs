//! # Domain Models
//!
//! These structs represent the core entities of PetHub.
//! Identifiers are the store's integer keys wrapped in newtypes so a
//! `PetId` can never be passed where an `ApplicationId` is expected.

mod application;
mod forum;
mod ids;
mod notification;
mod page;
mod pet;
mod photos;
mod report;
mod user;

pub use application::*;
pub use forum::*;
pub use ids::*;
pub use notification::*;
pub use page::*;
pub use pet::*;
pub use photos::*;
pub use report::*;
pub use user::*;
