use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use domains::PetId;
use services::{check_pet_fields, CreatePet, NotificationHandle};
use tracing::Instrument;

use crate::dto::{CreatePetResponse, MessageResponse, PetView};
use crate::metrics::Metrics;
use crate::web::upload::{store_all, UploadForm};
use crate::web::{ApiError, ApiPath, AppState, AuthUser};

const PHOTO_FIELD: &str = "petPhoto";
const CERTIFICATE_FIELD: &str = "vaccinationCertificate";

pub async fn details(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<PetView>, ApiError> {
    let details = state.pets.details(PetId(pet_id)).await?;
    Ok(Json(details.into()))
}

/// Multipart fields: `name`, `type`, `species`, `breed`, `description`,
/// up to four `petPhoto` files and one to four `vaccinationCertificate`
/// files.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePetResponse>), ApiError> {
    let mut form = UploadForm::read(&mut multipart, &[PHOTO_FIELD, CERTIFICATE_FIELD]).await?;
    let name = form.text(&["name"]).unwrap_or_default();
    check_pet_fields(
        &name,
        form.file_count(PHOTO_FIELD),
        form.file_count(CERTIFICATE_FIELD),
    )?;

    let media = state.media.as_ref();
    let photos = store_all(media, form.take_files(PHOTO_FIELD)).await?;
    let vaccination_certificates = store_all(media, form.take_files(CERTIFICATE_FIELD)).await?;
    let input = CreatePet {
        name,
        pet_type: form.text(&["type"]),
        species: form.text(&["species"]),
        breed: form.text(&["breed"]),
        description: form.text(&["description"]),
        photos,
        vaccination_certificates,
    };
    let id = state.pets.create(&principal, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePetResponse {
            message: "Pet added".into(),
            pet_id: id.0,
        }),
    ))
}

fn count_owner_notification(metrics: Arc<Metrics>, notification: NotificationHandle) {
    tokio::spawn(
        async move {
            let outcome = notification.outcome().await;
            metrics.record_side_effect("notification", &outcome);
        }
        .in_current_span(),
    );
}

pub async fn approve(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let notification = state.pets.review(&principal, PetId(pet_id), true).await?;
    count_owner_notification(Arc::clone(&state.metrics), notification);
    Ok(Json(MessageResponse::new("Pet approved successfully")))
}

pub async fn decline(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let notification = state.pets.review(&principal, PetId(pet_id), false).await?;
    count_owner_notification(Arc::clone(&state.metrics), notification);
    Ok(Json(MessageResponse::new("Pet declined successfully")))
}
