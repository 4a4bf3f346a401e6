//! # 내 정보(Profile) 라우트 핸들러
//!
//! 호출자 자신의 계정만 다룹니다. 대상은 토큰의 `sub`로 결정됩니다.
//!
//! - `GET    /api/profile` → 내 정보
//! - `PUT    /api/profile` → 이메일/비밀번호 변경 (비밀번호는 다시 해싱)
//! - `DELETE /api/profile` → 내 계정 soft delete
//!
//! 삭제 후에도 이미 발급된 토큰은 만료 전까지 서명상 유효하지만,
//! 사용자 조회가 실패하므로 이 엔드포인트들은 404를 돌려줍니다.

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::AuthUser,
    models::user::*,
    routes::AppState,
    services,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = services::auth::update_profile(&state.pool, &auth_user.user_id, &req).await?;
    tracing::info!("Profile updated: {}", user.id);
    Ok(Json(user.into()))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    if !db_users::soft_delete_user(&state.pool, &auth_user.user_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(
        "User deleted own account: {} ({})",
        auth_user.username,
        auth_user.user_id
    );
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
