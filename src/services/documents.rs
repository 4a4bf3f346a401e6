//! # 문서 서비스
//!
//! 문서 생성/수정/삭제와, 응답용 `DocumentResponse` 조립(작성자·서비스·태그)을 담당합니다.
//!
//! 작성자 외의 사용자도 문서를 수정/삭제할 수 있습니다 (소유권 검사 없음).
//! 참조한 `service_id`의 존재 여부도 확인하지 않습니다.

use sqlx::SqlitePool;

use crate::{db, error::AppError, models::*};

/// 문서 한 건에 작성자, 연결된 서비스, 태그를 붙여 응답 형태로 만듭니다.
pub async fn load_document(pool: &SqlitePool, document: Document) -> Result<DocumentResponse, AppError> {
    let author = db::documents::get_author(pool, &document.author_id).await?;
    let service = match &document.service_id {
        Some(service_id) => db::get_service(pool, service_id).await?,
        None => None,
    };
    let tags = db::get_document_tags(pool, &document.id).await?;

    Ok(DocumentResponse {
        document,
        author,
        service,
        tags,
    })
}

pub async fn load_documents(
    pool: &SqlitePool,
    documents: Vec<Document>,
) -> Result<Vec<DocumentResponse>, AppError> {
    let mut loaded = Vec::with_capacity(documents.len());
    for document in documents {
        loaded.push(load_document(pool, document).await?);
    }
    Ok(loaded)
}

pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<DocumentResponse, AppError> {
    let document = db::get_document(pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    load_document(pool, document).await
}

/// 호출자를 작성자로 하여 문서를 만들고 태그를 연결합니다.
///
/// 문서 INSERT와 태그 연결은 하나의 트랜잭션입니다.
pub async fn create_document(
    pool: &SqlitePool,
    req: &CreateDocumentRequest,
    author_id: &str,
) -> Result<DocumentResponse, AppError> {
    req.validate()?;

    let mut tx = pool.begin().await?;
    let document = db::create_document(&mut tx, req, author_id).await?;
    let tag_names = normalize_tag_names(&req.tags);
    if !tag_names.is_empty() {
        db::replace_document_tags(&mut tx, &document.id, &tag_names).await?;
    }
    tx.commit().await?;

    tracing::info!("Document created: {} by user {}", document.id, author_id);
    load_document(pool, document).await
}

/// 문서를 수정하고, 수정 직전 내용을 버전 기록으로 남깁니다.
///
/// `tags`가 주어지면 태그 집합을 통째로 교체합니다 (빈 배열 = 모든 태그 제거).
///
/// 직전 내용 조회 → 스냅샷 저장 → UPDATE → 태그 교체가 하나의 트랜잭션입니다.
/// `BEGIN IMMEDIATE`로 시작해 쓰기 잠금을 먼저 잡으므로, 동시에 들어온 수정은
/// 차례로 실행되고 각 스냅샷은 바로 앞 버전과 일치합니다.
pub async fn update_document(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateDocumentRequest,
    editor_id: &str,
) -> Result<DocumentResponse, AppError> {
    req.validate()?;

    // 에러로 일찍 반환하면 tx가 drop되면서 롤백됩니다
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let previous = db::get_document(&mut *tx, id)
        .await?
        .ok_or(AppError::NotFound)?;
    db::create_version(&mut tx, id, previous.version, &previous.content, editor_id).await?;

    let document = db::update_document(&mut tx, id, req)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(tags) = &req.tags {
        db::replace_document_tags(&mut tx, id, &normalize_tag_names(tags)).await?;
    }
    tx.commit().await?;

    tracing::info!(
        "Document updated: {} (v{} -> v{}) by user {}",
        id,
        previous.version,
        document.version,
        editor_id
    );
    load_document(pool, document).await
}

pub async fn delete_document(pool: &SqlitePool, id: &str, user_id: &str) -> Result<(), AppError> {
    if !db::soft_delete_document(pool, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("Document deleted: {} by user {}", id, user_id);
    Ok(())
}
