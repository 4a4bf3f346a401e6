//! # 태그 라우트 핸들러
//!
//! 태그는 문서 생성/수정 시 이름으로 자동 생성되므로 조회만 제공합니다.
//! 태그별 문서 목록은 `documents::list_documents_by_tag`를 보세요.

use crate::{db, error::AppError, routes::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /api/tags` → `{ "tags": [...] }`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    Ok(Json(json!({ "tags": tags })))
}
