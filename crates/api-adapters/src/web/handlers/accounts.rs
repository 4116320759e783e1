use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::web::{ApiError, ApiJson, AppState};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let id = state.accounts.register(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".into(),
            user_id: id.0,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.accounts.login(&body.email, &body.password).await?;
    Ok(Json(session.into()))
}
