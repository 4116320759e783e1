use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PetId, PhotoList, UserId};

/// Availability value written when an application for the pet is approved.
pub const AVAILABILITY_ADOPTED: &str = "Adopted";

/// Availability of a freshly listed pet.
pub const AVAILABILITY_AVAILABLE: &str = "Available";

/// An adoptable animal.
///
/// `availability` is a cached projection of "has an approved
/// application". Only the pet status synchronizer writes it, and it is
/// not re-derived when the approving application is later deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub owner_id: UserId,
    pub name: String,
    pub pet_type: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    /// Forum-wide visibility; unrelated to any application status.
    pub is_approved: bool,
    pub availability: Option<String>,
    pub photos: PhotoList,
    pub vaccination_certificates: PhotoList,
    pub date_added: DateTime<Utc>,
}

/// A pet as returned by detail lookups, with the owner's name and the
/// name of the applicant whose application was approved (if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDetails {
    pub pet: Pet,
    pub owner_full_name: String,
    pub owner_email: String,
    pub new_owner_full_name: Option<String>,
}

/// A listing submitted by a member. It stays unapproved until an admin
/// approves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub owner_id: UserId,
    pub name: String,
    pub pet_type: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub photos: PhotoList,
    pub vaccination_certificates: PhotoList,
}

impl Pet {
    pub fn is_adopted(&self) -> bool {
        self.availability.as_deref() == Some(AVAILABILITY_ADOPTED)
    }
}
