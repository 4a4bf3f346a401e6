//! # 관리자 라우트 핸들러
//!
//! `require_auth` + `require_role(Role::Admin)` 레이어 뒤에서만 실행됩니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/admin/users?page=&limit= | 사용자 목록 (페이지네이션) |
//! | PUT | /api/admin/users/{id}/role | 사용자 역할 변경 |

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::AuthUser,
    models::user::*,
    routes::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

/// `{ "users": [...], "total": N, "page": P, "limit": L }`
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Value>, AppError> {
    let (page, limit) = query.resolve();
    let (users, total) = db_users::list_users(&state.pool, page, limit).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(json!({
        "users": users,
        "total": total,
        "page": page,
        "limit": limit,
    })))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::update_user_role(&state.pool, &id, req.role)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(
        "User {} role set to '{}' by admin {}",
        user.id,
        req.role,
        auth_user.user_id
    );
    Ok(Json(user.into()))
}
