use crate::{db, error::AppError, routes::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

/// `GET /api/documents/{id}/versions` → `{ "versions": [...] }` (최신 버전 먼저)
pub async fn list_document_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 삭제된 문서의 기록은 노출하지 않습니다
    db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let versions = db::list_versions(&state.pool, &id).await?;
    Ok(Json(json!({ "versions": versions })))
}
