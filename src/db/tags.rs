//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 조회 및 문서-태그 관계를 관리하는 SQL 쿼리 함수들입니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name UNIQUE)
//! - `document_tags`: 문서와 태그의 다대다(N:M) 관계 테이블
//!
//! 태그는 별도 생성 API 없이, 문서에 붙일 이름이 처음 등장할 때 만들어집니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqlitePool};

/// 모든 태그를 이름순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

/// 특정 문서에 연결된 모든 태그를 조회합니다.
///
/// ```sql
/// tags ←── document_tags ──→ documents
///  (1)         (N:M)           (1)
/// ```
pub async fn get_document_tags(pool: &SqlitePool, document_id: &str) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN document_tags dt ON dt.tag_id = t.id
        WHERE dt.document_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 문서의 태그 집합을 `names`로 통째로 교체합니다.
///
/// 기존 연결 삭제 → 없는 태그 생성 → 새 연결 추가 순서로 실행합니다.
/// 호출자가 연 트랜잭션 안에서 실행되므로, 중간에 실패하면 이전 태그 집합이 그대로 남습니다.
/// `names`는 호출 전에 정규화(공백 제거, 중복 제거)되어 있어야 합니다.
pub async fn replace_document_tags(
    conn: &mut SqliteConnection,
    document_id: &str,
    names: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM document_tags WHERE document_id = ?")
        .bind(document_id)
        .execute(&mut *conn)
        .await?;

    for name in names {
        // INSERT OR IGNORE: 같은 이름의 태그가 이미 있으면 그대로 재사용
        sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)")
            .bind(uuid::Uuid::now_v7().to_string())
            .bind(name)
            .execute(&mut *conn)
            .await?;

        let tag_id: String = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query("INSERT OR IGNORE INTO document_tags (document_id, tag_id) VALUES (?, ?)")
            .bind(document_id)
            .bind(&tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
