use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ApplicationId, PetId, PhotoList, UserId};
use crate::errors::DomainError;

/// Lifecycle state of an adoption application.
///
/// `pending` is the only initial state. Status writes are not checked
/// against the current state: any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    /// Older clients and rows say `rejected`; both mean the same outcome.
    #[serde(alias = "rejected")]
    Declined,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" | "rejected" => Ok(Self::Declined),
            other => Err(DomainError::Validation(format!(
                "unknown application status '{other}'"
            ))),
        }
    }
}

/// Free-text answers the applicant supplies. All optional; only the
/// pet reference is mandatory for a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationAnswers {
    pub pet_experience: Option<String>,
    pub home_environment: Option<String>,
    pub other_pets: Option<String>,
    pub children_at_home: Option<String>,
    pub reason_for_adoption: Option<String>,
}

/// One user's request to adopt one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant_id: UserId,
    pub pet_id: PetId,
    pub answers: ApplicationAnswers,
    pub status: ApplicationStatus,
    pub date_submitted: DateTime<Utc>,
}

/// Insert payload. The applicant always comes from the authenticated
/// principal, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub applicant_id: UserId,
    pub pet_id: PetId,
    pub answers: ApplicationAnswers,
}

/// Everything the status cascade needs, joined across the application,
/// its pet, the applicant and the pet's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationContext {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub pet_id: PetId,
    pub pet_name: String,
    pub pet_owner_id: UserId,
    pub applicant_id: UserId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub owner_email: String,
    pub owner_contact_number: Option<String>,
    pub owner_address: Option<String>,
}

/// Listing row: an application plus the pet and applicant columns the
/// owner and admin views display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub application: Application,
    pub pet_name: String,
    pub pet_photos: PhotoList,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_address: Option<String>,
    pub applicant_contact_number: Option<String>,
    pub applicant_profile_photo: Option<String>,
}
