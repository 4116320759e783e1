use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::{ApplicationId, ApplicationStatus, PageRequest, UserId};
use tracing::Instrument;

use crate::dto::{
    ApplicationPageResponse, ApplicationView, ApplicationsResponse, ListQuery, MessageResponse,
    SubmitApplicationRequest, SubmitApplicationResponse, UpdateStatusRequest,
};
use crate::web::{ApiError, ApiJson, ApiPath, ApiQuery, AppState, AuthUser};

pub async fn submit(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(body): ApiJson<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<SubmitApplicationResponse>), ApiError> {
    let id = state.applications.submit(&principal, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitApplicationResponse {
            message: "Application submitted successfully".into(),
            application_id: id.0,
        }),
    ))
}

/// Responds once the status is written and read back. The notification
/// outcome is only counted, on a detached task.
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(application_id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status: ApplicationStatus = body.status.parse()?;
    let change = state
        .applications
        .update_status(&principal, ApplicationId(application_id), status)
        .await?;

    state.metrics.record_status_update(change.status);
    state.metrics.record_side_effect("cascade", &change.cascade);

    let metrics = Arc::clone(&state.metrics);
    let notification = change.notification;
    tokio::spawn(
        async move {
            let outcome = notification.outcome().await;
            metrics.record_side_effect("notification", &outcome);
        }
        .in_current_span(),
    );

    Ok(Json(MessageResponse::new(
        "Application status updated successfully",
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(application_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .applications
        .delete(&principal, ApplicationId(application_id))
        .await?;
    Ok(Json(MessageResponse::new("Application deleted successfully")))
}

pub async fn for_owner(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    ApiPath(owner_id): ApiPath<i64>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    let applications = state.applications.for_owner(UserId(owner_id)).await?;
    Ok(Json(ApplicationsResponse {
        applications: applications.into_iter().map(ApplicationView::from).collect(),
    }))
}

pub async fn for_my_pets(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    let applications = state.applications.for_my_pets(&principal).await?;
    Ok(Json(ApplicationsResponse {
        applications: applications.into_iter().map(ApplicationView::from).collect(),
    }))
}

pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApplicationPageResponse>, ApiError> {
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(10),
        query.search_query,
    );
    let page_size = request.page_size;
    let page = state.applications.list_all(&principal, request).await?;
    let total_pages = page.total_pages(page_size);

    Ok(Json(ApplicationPageResponse {
        applications: page.items.into_iter().map(ApplicationView::from).collect(),
        total_pages,
    }))
}
