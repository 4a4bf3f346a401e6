use crate::error::AppError;
use crate::models::DocumentVersion;
use sqlx::{SqliteConnection, SqlitePool};

/// 문서의 현재(수정 직전) 내용을 버전 스냅샷으로 저장합니다.
///
/// 문서 UPDATE와 같은 트랜잭션에서 호출해야 스냅샷이 실제 직전 내용과 일치합니다.
pub async fn create_version(
    conn: &mut SqliteConnection,
    document_id: &str,
    version: i64,
    content: &str,
    created_by: &str,
) -> Result<DocumentVersion, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO document_versions (id, document_id, version, content, created_by)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(document_id)
    .bind(version)
    .bind(content)
    .bind(created_by)
    .execute(&mut *conn)
    .await?;

    let created = sqlx::query_as::<_, DocumentVersion>(
        r#"
        SELECT id, document_id, version, content, created_by, created_at
        FROM document_versions
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(created)
}

/// 문서의 버전 기록을 최신 버전부터 조회합니다.
pub async fn list_versions(
    pool: &SqlitePool,
    document_id: &str,
) -> Result<Vec<DocumentVersion>, AppError> {
    let versions = sqlx::query_as::<_, DocumentVersion>(
        r#"
        SELECT id, document_id, version, content, created_by, created_at
        FROM document_versions
        WHERE document_id = ?
        ORDER BY version DESC
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(versions)
}
