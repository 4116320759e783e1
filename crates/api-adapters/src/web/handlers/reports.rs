use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use domains::ReportId;
use services::{check_report_fields, CreateReport, ReportUpdate};

use crate::dto::{CreateReportResponse, MessageResponse, ReportView};
use crate::web::upload::{store_all, UploadForm};
use crate::web::{ApiError, ApiPath, AppState, AuthUser};

/// Multipart fields: `reportType`, `description`, `location`,
/// `contactInfo` and one to four files under `photo`. Only the paths the
/// media store hands back are recorded.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateReportResponse>), ApiError> {
    let mut form = UploadForm::read(&mut multipart, &["photo"]).await?;
    let report_type = form.text(&["reportType"]).unwrap_or_default();
    check_report_fields(&report_type, form.file_count("photo"))?;

    let photos = store_all(state.media.as_ref(), form.take_files("photo")).await?;
    let input = CreateReport {
        report_type,
        description: form.text(&["description"]),
        location: form.text(&["location"]),
        contact_info: form.text(&["contactInfo"]),
        photos,
    };
    let id = state.reports.create(&principal, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            message: "Report added successfully".into(),
            report_id: id.0,
        }),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(report_id): ApiPath<i64>,
) -> Result<Json<ReportView>, ApiError> {
    let report = state.reports.get(ReportId(report_id)).await?;
    Ok(Json(report.into()))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<ReportView>>, ApiError> {
    let reports = state.reports.mine(&principal).await?;
    Ok(Json(reports.into_iter().map(ReportView::from).collect()))
}

/// Multipart fields: `ReportType`, `Description`, `Location`, `Status`
/// and an optional file under `Photo`. Blank text fields are ignored.
/// The photo is stored only once the caller may edit the report.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(report_id): ApiPath<i64>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = ReportId(report_id);
    let mut form = UploadForm::read(&mut multipart, &["Photo"]).await?;
    state.reports.editable(&principal, id).await?;

    let new_photo = match form.take_files("Photo").pop() {
        Some(photo) => Some(
            state
                .media
                .save_upload(photo.data, photo.content_type, photo.file_name)
                .await?,
        ),
        None => None,
    };
    let update = ReportUpdate {
        report_type: form.text(&["ReportType"]),
        description: form.text(&["Description"]),
        location: form.text(&["Location"]),
        status: form.text(&["Status"]),
        new_photo,
    };
    state.reports.update(&principal, id, update).await?;
    Ok(Json(MessageResponse::new("Report updated successfully")))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(report_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.reports.delete(&principal, ReportId(report_id)).await?;
    Ok(Json(MessageResponse::new("Report deleted successfully")))
}
