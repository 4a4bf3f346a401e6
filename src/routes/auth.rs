//! # 인증 라우트 핸들러
//!
//! - `POST /api/auth/register` → 201, 생성된 사용자
//! - `POST /api/auth/login`    → 200, `{ "token": "...", "user": {...} }`
//!
//! 두 엔드포인트 모두 인증 없이 호출할 수 있습니다.

use crate::{error::AppError, models::user::*, routes::AppState, services};
use axum::{extract::State, http::StatusCode, Json};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = services::auth::register(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = services::auth::login(
        &state.pool,
        &req,
        &state.jwt_secret,
        state.jwt_expiration_hours,
    )
    .await?;
    Ok(Json(response))
}
