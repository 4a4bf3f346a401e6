//! # 사용자 데이터베이스 쿼리 모듈
//!
//! `users` 테이블 쿼리 함수들입니다. 비밀번호는 항상 해시된 상태로만 전달받습니다.

use crate::error::{map_unique_violation, AppError};
use crate::models::user::{Role, User};
use sqlx::SqlitePool;

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .execute(pool)
    .await
    // 중복 검사와 INSERT 사이에 다른 요청이 끼어든 경우
    .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE username = ? AND deleted_at IS NULL
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 사용자명이 이미 사용 중인지 확인합니다.
///
/// UNIQUE 인덱스는 soft delete된 행도 포함하므로, 여기서도 삭제된 계정을 함께 봅니다.
/// 컬럼이 `COLLATE NOCASE`이므로 비교는 대소문자를 구분하지 않습니다.
pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, AppError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? LIMIT 1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, AppError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ? LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

/// 이메일 및/또는 비밀번호 해시를 변경합니다. None인 항목은 그대로 둡니다.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET email = COALESCE(?, email),
            password_hash = COALESCE(?, password_hash),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Email already exists"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn update_user_role(
    pool: &SqlitePool,
    id: &str,
    role: Role,
) -> Result<Option<User>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET role = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(role.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// 사용자를 soft delete합니다. 이미 삭제되었거나 없으면 false.
pub async fn soft_delete_user(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 페이지 단위로 사용자 목록과 전체 사용자 수를 조회합니다. `page`는 1부터 시작합니다.
pub async fn list_users(
    pool: &SqlitePool,
    page: i64,
    limit: i64,
) -> Result<(Vec<User>, i64), AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE deleted_at IS NULL
        ORDER BY created_at, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    // page가 매우 크면 곱셈이 넘칠 수 있으므로 포화 연산 (결과는 빈 페이지)
    .bind((page - 1).saturating_mul(limit))
    .fetch_all(pool)
    .await?;

    Ok((users, total))
}
