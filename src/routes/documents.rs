//! # 문서(Document) 라우트 핸들러
//!
//! ## 엔드포인트 (모두 인증 필요)
//! - `GET    /api/documents`                     → 문서 목록
//! - `POST   /api/documents`                     → 새 문서 (작성자 = 호출자), 201
//! - `GET    /api/documents/{id}`                → 단일 문서
//! - `PUT    /api/documents/{id}`                → 문서 수정 (버전 증가)
//! - `DELETE /api/documents/{id}`                → 문서 soft delete
//! - `GET    /api/documents/author/{author_id}`  → 작성자별 목록
//! - `GET    /api/documents/category/{category}` → 카테고리별 목록
//! - `GET    /api/documents/tag/{name}`          → 태그 이름별 목록
//!
//! 응답의 각 문서에는 `author`, `service`, `tags`가 함께 담깁니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /api/documents` → `{ "documents": [...] }`
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let documents = db::list_documents(&state.pool).await?;
    let documents = services::documents::load_documents(&state.pool, documents).await?;
    Ok(Json(json!({ "documents": documents })))
}

pub async fn list_documents_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let documents = db::list_documents_by_author(&state.pool, &author_id).await?;
    let documents = services::documents::load_documents(&state.pool, documents).await?;
    Ok(Json(json!({ "documents": documents })))
}

pub async fn list_documents_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let documents = db::list_documents_by_category(&state.pool, &category).await?;
    let documents = services::documents::load_documents(&state.pool, documents).await?;
    Ok(Json(json!({ "documents": documents })))
}

pub async fn list_documents_by_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let documents = db::list_documents_by_tag(&state.pool, &name).await?;
    let documents = services::documents::load_documents(&state.pool, documents).await?;
    Ok(Json(json!({ "documents": documents })))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = services::documents::get_document(&state.pool, &id).await?;
    Ok(Json(document))
}

/// `POST /api/documents` — 요청 본문의 작성자 필드는 무시하고 토큰의 사용자를 작성자로 씁니다.
pub async fn create_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let document =
        services::documents::create_document(&state.pool, &req, &auth_user.user_id).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn update_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document =
        services::documents::update_document(&state.pool, &id, &req, &auth_user.user_id).await?;
    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    services::documents::delete_document(&state.pool, &id, &auth_user.user_id).await?;
    Ok(Json(json!({ "message": "Document deleted successfully" })))
}
