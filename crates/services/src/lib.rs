//! # services
//!
//! Use-case orchestration over the `domains` ports.
//!
//! The adoption workflow lives in [`applications`]: a status change is
//! written and read back first, then the pet cascade and the outbound
//! notification run as soft dependencies whose failures are logged and
//! reported as [`SideEffect`] values instead of errors.

pub mod accounts;
pub mod applications;
pub mod forum;
pub mod formatting;
pub mod notification;
pub mod pets;
pub mod reports;
mod side_effect;

pub use accounts::{AccountService, RegisterUser, Session};
pub use applications::{ApplicationService, StatusChange, SubmitApplication};
pub use forum::{check_post_fields, CreatePost, ForumService, PostUpdate, MAX_POST_IMAGES};
pub use notification::{
    compose_pet_review_message, compose_status_message, NotificationDispatcher,
    NotificationHandle,
};
pub use pets::{check_pet_fields, CreatePet, PetService, PetStatusSynchronizer, MAX_PET_FILES};
pub use reports::{
    check_report_fields, CreateReport, ReportService, ReportUpdate, MAX_REPORT_PHOTOS,
};
pub use side_effect::SideEffect;
