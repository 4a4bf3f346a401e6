//! # 댓글 라우트 핸들러
//!
//! - `GET    /api/documents/{id}/comments` → 문서의 댓글 목록 (작성 순)
//! - `POST   /api/documents/{id}/comments` → 댓글 작성, 201
//! - `DELETE /api/comments/{id}`           → 댓글 soft delete (작성자 또는 admin만)

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_comments(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_document(&state.pool, &document_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let comments = db::list_comments(&state.pool, &document_id).await?;
    Ok(Json(json!({ "comments": comments })))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(document_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    req.validate()?;

    db::get_document(&state.pool, &document_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let comment = db::create_comment(
        &state.pool,
        &document_id,
        &auth_user.user_id,
        req.content.trim(),
    )
    .await?;

    tracing::info!("Comment {} added to document {}", comment.id, document_id);
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let comment = db::get_comment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if comment.user_id != auth_user.user_id && !auth_user.has_role(Role::Admin) {
        return Err(AppError::Forbidden(
            "Only the comment author or an admin can delete this comment".to_string(),
        ));
    }

    if !db::soft_delete_comment(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!("Comment deleted: {} by user {}", id, auth_user.user_id);
    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}
