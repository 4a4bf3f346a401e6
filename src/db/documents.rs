//! # 문서 데이터베이스 쿼리 모듈
//!
//! 이 파일에는 `documents` 테이블에 대한
//! CRUD(Create, Read, Update, Delete) 쿼리 함수들이 정의되어 있습니다.
//!
//! 모든 함수는 `async`이며 `SqlitePool`을 받아 데이터베이스와 상호작용합니다.
//! 삭제는 soft delete(`deleted_at` 기록)이므로 모든 조회 쿼리는
//! `deleted_at IS NULL` 조건으로 삭제된 문서를 제외합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

/// 모든 문서를 최신 생성순으로 조회합니다.
pub async fn list_documents(pool: &SqlitePool) -> Result<Vec<Document>, AppError> {
    let docs = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, content, category, doc_type, author_id, service_id,
               version, is_published, published_at, created_at, updated_at
        FROM documents
        WHERE deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// 특정 작성자의 문서를 조회합니다.
pub async fn list_documents_by_author(
    pool: &SqlitePool,
    author_id: &str,
) -> Result<Vec<Document>, AppError> {
    let docs = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, content, category, doc_type, author_id, service_id,
               version, is_published, published_at, created_at, updated_at
        FROM documents
        WHERE author_id = ? AND deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// 카테고리가 정확히 일치하는 문서를 조회합니다.
pub async fn list_documents_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<Vec<Document>, AppError> {
    let docs = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, content, category, doc_type, author_id, service_id,
               version, is_published, published_at, created_at, updated_at
        FROM documents
        WHERE category = ? AND deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// 주어진 이름의 태그가 붙은 문서를 조회합니다.
pub async fn list_documents_by_tag(
    pool: &SqlitePool,
    tag_name: &str,
) -> Result<Vec<Document>, AppError> {
    let docs = sqlx::query_as::<_, Document>(
        r#"
        SELECT d.id, d.title, d.content, d.category, d.doc_type, d.author_id, d.service_id,
               d.version, d.is_published, d.published_at, d.created_at, d.updated_at
        FROM documents d
        JOIN document_tags dt ON dt.document_id = d.id
        JOIN tags t ON t.id = dt.tag_id
        WHERE t.name = ? AND d.deleted_at IS NULL
        ORDER BY d.created_at DESC, d.id DESC
        "#,
    )
    .bind(tag_name)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// ID로 단일 문서를 조회합니다.
///
/// 풀(`&SqlitePool`)과 트랜잭션 안의 연결(`&mut *tx`) 양쪽에서 호출할 수 있습니다.
///
/// # 반환값
/// - `Ok(Some(Document))`: 문서를 찾은 경우
/// - `Ok(None)`: 해당 ID의 문서가 없거나 삭제된 경우
pub async fn get_document<'e, E>(executor: E, id: &str) -> Result<Option<Document>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let doc = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, content, category, doc_type, author_id, service_id,
               version, is_published, published_at, created_at, updated_at
        FROM documents
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doc)
}

/// 문서 작성자의 공개 정보를 조회합니다.
pub async fn get_author(pool: &SqlitePool, author_id: &str) -> Result<Option<AuthorSummary>, AppError> {
    let author = sqlx::query_as::<_, AuthorSummary>(
        "SELECT id, username FROM users WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

/// 새 문서를 생성합니다.
///
/// 태그 연결은 여기서 하지 않습니다 (`db::replace_document_tags` 참고).
/// `service_id`가 실제로 존재하는지는 확인하지 않습니다.
pub async fn create_document(
    conn: &mut SqliteConnection,
    req: &CreateDocumentRequest,
    author_id: &str,
) -> Result<Document, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO documents
            (id, title, content, category, doc_type, author_id, service_id, is_published, published_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?,
                CASE WHEN ? THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now') END)
        "#,
    )
    .bind(&id)
    .bind(req.title.trim())
    .bind(&req.content)
    .bind(&req.category)
    .bind(&req.doc_type)
    .bind(author_id)
    .bind(&req.service_id)
    .bind(req.is_published)
    .bind(req.is_published)
    .execute(&mut *conn)
    .await?;

    get_document(&mut *conn, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))
}

/// 문서를 수정합니다 (보낸 필드만 변경).
///
/// 수정할 때마다 `version`이 1 증가하고, 처음 공개(`is_published = true`)되는 시점에
/// `published_at`이 기록됩니다. 태그는 호출자가 별도로 교체합니다.
///
/// 버전 스냅샷과 같은 트랜잭션에서 실행되도록 연결을 직접 받습니다.
///
/// # 반환값
/// - `Ok(Some(Document))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 문서가 없음
pub async fn update_document(
    conn: &mut SqliteConnection,
    id: &str,
    req: &UpdateDocumentRequest,
) -> Result<Option<Document>, AppError> {
    // service_id는 "변경 안 함 / NULL로 / 값으로" 세 가지이므로 플래그를 함께 바인딩합니다.
    let service_id_set = req.service_id.is_some();
    let service_id = req.service_id.clone().flatten();

    let result = sqlx::query(
        r#"
        UPDATE documents
        SET title = COALESCE(?, title),
            content = COALESCE(?, content),
            category = COALESCE(?, category),
            doc_type = COALESCE(?, doc_type),
            service_id = CASE WHEN ? THEN ? ELSE service_id END,
            is_published = COALESCE(?, is_published),
            published_at = CASE
                WHEN COALESCE(?, is_published) AND published_at IS NULL
                THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                ELSE published_at
            END,
            version = version + 1,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(req.title.as_deref().map(str::trim))
    .bind(&req.content)
    .bind(&req.category)
    .bind(&req.doc_type)
    .bind(service_id_set)
    .bind(service_id)
    .bind(req.is_published)
    .bind(req.is_published)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_document(&mut *conn, id).await
}

/// 문서를 soft delete합니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제 성공
/// - `Ok(false)`: 해당 ID의 문서가 없거나 이미 삭제됨
pub async fn soft_delete_document(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
