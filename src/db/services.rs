//! # 서비스(Service) 엔티티 쿼리 모듈
//!
//! `services` 테이블 CRUD. 삭제는 soft delete이며,
//! 삭제된 서비스를 참조하던 문서는 `service_id`를 유지하되 `service` 정보는 비어 보입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

pub async fn list_services(pool: &SqlitePool) -> Result<Vec<Service>, AppError> {
    let services = sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, category, created_at, updated_at
        FROM services
        WHERE deleted_at IS NULL
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn list_services_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<Vec<Service>, AppError> {
    let services = sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, category, created_at, updated_at
        FROM services
        WHERE category = ? AND deleted_at IS NULL
        ORDER BY name
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn get_service(pool: &SqlitePool, id: &str) -> Result<Option<Service>, AppError> {
    let service = sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, category, created_at, updated_at
        FROM services
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(
    pool: &SqlitePool,
    req: &CreateServiceRequest,
) -> Result<Service, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO services (id, name, category) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .bind(&req.category)
        .execute(pool)
        .await?;

    get_service(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created service".to_string()))
}

/// 서비스를 부분 업데이트합니다. 대상이 없으면 `Ok(None)`.
pub async fn update_service(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateServiceRequest,
) -> Result<Option<Service>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE services
        SET name = COALESCE(?, name),
            category = COALESCE(?, category),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(req.name.as_deref().map(str::trim))
    .bind(&req.category)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_service(pool, id).await
}

pub async fn soft_delete_service(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE services
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
