use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{CategoryId, CommentId, DomainError, PostId};
use services::{check_post_fields, CreatePost, MAX_POST_IMAGES};

use crate::dto::{
    CreateCommentRequest, CreateCommentResponse, CreatePostResponse, MessageResponse,
    MsgResponse, UpdateCommentRequest, UpdatePostRequest,
};
use crate::web::upload::{store_all, UploadForm};
use crate::web::{ApiError, ApiJson, ApiPath, AppState, AuthUser};

/// Multipart fields: `categoryId`, `title`, `content` and up to four
/// files under `images`.
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let mut form = UploadForm::read(&mut multipart, &["images"]).await?;
    let title = form.text(&["title"]).unwrap_or_default();
    let content = form.text(&["content"]).unwrap_or_default();
    check_post_fields(&title, &content)?;
    if form.file_count("images") > MAX_POST_IMAGES {
        return Err(DomainError::Validation(format!(
            "at most {MAX_POST_IMAGES} images per post"
        ))
        .into());
    }
    let raw_category = form
        .text(&["categoryId", "categoryID"])
        .ok_or_else(|| DomainError::Validation("categoryId is required".into()))?;
    let category_id = raw_category
        .parse::<i64>()
        .map(CategoryId)
        .map_err(|_| DomainError::Validation(format!("invalid categoryId: {raw_category}")))?;

    let images = store_all(state.media.as_ref(), form.take_files("images")).await?;
    let id = state
        .forum
        .create_post(
            &principal,
            CreatePost {
                category_id: Some(category_id),
                title,
                content,
                images,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post created successfully".into(),
            post_id: id.0,
        }),
    ))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CreateCommentResponse>), ApiError> {
    let post_id = body
        .post_id
        .map(PostId)
        .ok_or_else(|| DomainError::Validation("postId is required".into()))?;
    let id = state
        .forum
        .create_comment(&principal, post_id, body.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCommentResponse {
            message: "Comment added successfully".into(),
            comment_id: id.0,
        }),
    ))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(post_id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdatePostRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .forum
        .update_post(&principal, PostId(post_id), body.into())
        .await?;
    Ok(Json(MessageResponse::new("Post updated successfully")))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(post_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.forum.delete_post(&principal, PostId(post_id)).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(comment_id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateCommentRequest>,
) -> Result<Json<MsgResponse>, ApiError> {
    state
        .forum
        .update_comment(&principal, CommentId(comment_id), body.content)
        .await?;
    Ok(Json(MsgResponse::new("Comment updated successfully")))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(comment_id): ApiPath<i64>,
) -> Result<Json<MsgResponse>, ApiError> {
    state
        .forum
        .delete_comment(&principal, CommentId(comment_id))
        .await?;
    Ok(Json(MsgResponse::new("Comment deleted successfully")))
}
