//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire; dates are pre-formatted for
//! display the way the listing pages show them.

use domains::{ApplicationAnswers, ApplicationSummary, PetDetails, PetId, Report};
use serde::{Deserialize, Serialize};
use services::formatting::{display_date, display_datetime, NOT_ADOPTED};
use services::{PostUpdate, RegisterUser, Session, SubmitApplication};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Comment endpoints answer with `msg` rather than `message`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgResponse {
    pub msg: String,
}

impl MsgResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// ── Accounts ────────────────────────────────────────────────────────────────

/// Accepts both the PascalCase field names of the legacy forms and camelCase.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
    #[serde(rename = "Password", alias = "password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub msg: String,
    pub token: String,
    pub user_type: String,
    pub user: LoginUser,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            msg: "Logged in successfully".into(),
            token: session.token,
            user_type: session.role.as_user_type().to_owned(),
            user: LoginUser {
                id: session.user_id.0,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[serde(alias = "Fullname")]
    pub full_name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
    #[serde(alias = "Contactnumber")]
    pub contact_number: Option<String>,
    #[serde(alias = "Address")]
    pub address: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        RegisterUser {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            contact_number: req.contact_number.filter(|c| !c.trim().is_empty()),
            address: req.address.filter(|a| !a.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub msg: String,
    pub user_id: i64,
}

// ── Applications ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitApplicationRequest {
    pub pet_id: Option<i64>,
    pub pet_experience: Option<String>,
    pub home_environment: Option<String>,
    pub other_pets: Option<String>,
    pub children_at_home: Option<String>,
    pub reason_for_adoption: Option<String>,
}

impl From<SubmitApplicationRequest> for SubmitApplication {
    fn from(req: SubmitApplicationRequest) -> Self {
        SubmitApplication {
            pet_id: req.pet_id.map(PetId),
            answers: ApplicationAnswers {
                pet_experience: req.pet_experience,
                home_environment: req.home_environment,
                other_pets: req.other_pets,
                children_at_home: req.children_at_home,
                reason_for_adoption: req.reason_for_adoption,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationResponse {
    pub message: String,
    pub application_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub application_id: i64,
    pub applicant_id: i64,
    pub pet_id: i64,
    pub pet_name: String,
    pub pet_photos: Vec<String>,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_address: Option<String>,
    pub applicant_contact_number: Option<String>,
    pub applicant_profile_photo: Option<String>,
    pub pet_experience: Option<String>,
    pub home_environment: Option<String>,
    pub other_pets: Option<String>,
    pub children_at_home: Option<String>,
    pub reason_for_adoption: Option<String>,
    pub status: String,
    pub date_submitted: String,
}

impl From<ApplicationSummary> for ApplicationView {
    fn from(s: ApplicationSummary) -> Self {
        let a = s.application;
        Self {
            application_id: a.id.0,
            applicant_id: a.applicant_id.0,
            pet_id: a.pet_id.0,
            pet_name: s.pet_name,
            pet_photos: s.pet_photos.into_iter().collect(),
            applicant_name: s.applicant_name,
            applicant_email: s.applicant_email,
            applicant_address: s.applicant_address,
            applicant_contact_number: s.applicant_contact_number,
            applicant_profile_photo: s.applicant_profile_photo,
            pet_experience: a.answers.pet_experience,
            home_environment: a.answers.home_environment,
            other_pets: a.answers.other_pets,
            children_at_home: a.answers.children_at_home,
            reason_for_adoption: a.answers.reason_for_adoption,
            status: a.status.to_string(),
            date_submitted: display_date(&a.date_submitted),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationView>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPageResponse {
    pub applications: Vec<ApplicationView>,
    pub total_pages: u64,
}

// ── Pets ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView {
    pub pet_id: i64,
    pub owner_id: i64,
    pub pet_name: String,
    pub pet_type: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub is_approved: bool,
    pub status: Option<String>,
    pub pet_photos: Vec<String>,
    pub vaccination_certificates: Vec<String>,
    pub date_added: String,
    pub owner_full_name: String,
    pub owner_email: String,
    pub new_owner_full_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetResponse {
    pub message: String,
    pub pet_id: i64,
}

impl From<PetDetails> for PetView {
    fn from(d: PetDetails) -> Self {
        let pet = d.pet;
        Self {
            pet_id: pet.id.0,
            owner_id: pet.owner_id.0,
            pet_name: pet.name,
            pet_type: pet.pet_type,
            species: pet.species,
            breed: pet.breed,
            description: pet.description,
            is_approved: pet.is_approved,
            status: pet.availability,
            pet_photos: pet.photos.into_iter().collect(),
            vaccination_certificates: pet.vaccination_certificates.into_iter().collect(),
            date_added: display_date(&pet.date_added),
            owner_full_name: d.owner_full_name,
            owner_email: d.owner_email,
            new_owner_full_name: d
                .new_owner_full_name
                .unwrap_or_else(|| NOT_ADOPTED.to_owned()),
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponse {
    pub message: String,
    pub report_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub report_id: i64,
    pub reporter_id: i64,
    pub report_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub photos: Vec<String>,
    pub status: String,
    pub date_reported: String,
    pub reporter_full_name: Option<String>,
}

impl From<Report> for ReportView {
    fn from(r: Report) -> Self {
        Self {
            report_id: r.id.0,
            reporter_id: r.reporter_id.0,
            report_type: r.report_type,
            description: r.description,
            location: r.location,
            contact_info: r.contact_info,
            photos: r.photos.into_iter().collect(),
            status: r.status,
            date_reported: display_datetime(&r.date_reported),
            reporter_full_name: r.reporter_full_name,
        }
    }
}

// ── Forum ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

impl From<UpdatePostRequest> for PostUpdate {
    fn from(req: UpdatePostRequest) -> Self {
        PostUpdate {
            title: req.title,
            content: req.content,
            image: req.image.filter(|i| !i.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub message: String,
    pub post_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCommentRequest {
    #[serde(alias = "postID")]
    pub post_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentResponse {
    pub message: String,
    pub comment_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub content: String,
}
