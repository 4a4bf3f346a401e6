//! # 서비스(Service) 엔티티 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/services | 서비스 목록 |
//! | POST | /api/services | 서비스 생성 (201) |
//! | GET | /api/services/{id} | 단일 서비스 |
//! | PUT | /api/services/{id} | 서비스 수정 |
//! | DELETE | /api/services/{id} | 서비스 soft delete |
//! | GET | /api/services/category/{category} | 카테고리별 목록 |

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

pub async fn list_services(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let services = db::list_services(&state.pool).await?;
    Ok(Json(json!({ "services": services })))
}

pub async fn list_services_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let services = db::list_services_by_category(&state.pool, &category).await?;
    Ok(Json(json!({ "services": services })))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    let service = db::get_service(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(service))
}

pub async fn create_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    req.validate()?;
    let service = db::create_service(&state.pool, &req).await?;
    tracing::info!("Service created: {} by user {}", service.id, auth_user.user_id);
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    req.validate()?;
    let service = db::update_service(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!("Service updated: {} by user {}", id, auth_user.user_id);
    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !db::soft_delete_service(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("Service deleted: {} by user {}", id, auth_user.user_id);
    Ok(Json(json!({ "message": "Service deleted successfully" })))
}
