//! One module per resource. Handlers translate DTOs to service inputs and
//! back; authorization decisions stay in `services`.

pub mod accounts;
pub mod applications;
pub mod forum;
pub mod health;
pub mod pets;
pub mod reports;
