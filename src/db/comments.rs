//! # 댓글 데이터베이스 쿼리 모듈
//!
//! `comments` 테이블 쿼리. 작성자 이름은 `users`를 JOIN해서 함께 가져옵니다.

use crate::error::AppError;
use crate::models::Comment;
use sqlx::SqlitePool;

pub async fn list_comments(pool: &SqlitePool, document_id: &str) -> Result<Vec<Comment>, AppError> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.document_id, c.user_id, u.username, c.content, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.document_id = ? AND c.deleted_at IS NULL
        ORDER BY c.created_at, c.id
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

pub async fn get_comment(pool: &SqlitePool, id: &str) -> Result<Option<Comment>, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.document_id, c.user_id, u.username, c.content, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.id = ? AND c.deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

pub async fn create_comment(
    pool: &SqlitePool,
    document_id: &str,
    user_id: &str,
    content: &str,
) -> Result<Comment, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO comments (id, document_id, user_id, content) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(document_id)
        .bind(user_id)
        .bind(content)
        .execute(pool)
        .await?;

    get_comment(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created comment".to_string()))
}

pub async fn soft_delete_comment(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
