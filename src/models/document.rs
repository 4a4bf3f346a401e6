use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::models::{Service, Tag};

/// 문서 엔티티 — `documents` 테이블 한 행 (soft delete된 행은 조회되지 않음)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    /// JSON에서는 `type`으로 노출됩니다 (`type`은 Rust 예약어라 필드명을 바꿈)
    #[serde(rename = "type")]
    pub doc_type: String,
    pub author_id: String,
    pub service_id: Option<String>,
    pub version: i64,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 문서 작성자의 공개 정보
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorSummary {
    pub id: String,
    pub username: String,
}

/// API 응답용 문서 — 작성자, 태그, 연결된 서비스를 함께 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: Document,
    pub author: Option<AuthorSummary>,
    pub service: Option<Service>,
    pub tags: Vec<Tag>,
}

/// 태그 입력값 — 이름 문자열 또는 `{ "name": ... }` 객체 둘 다 허용합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Name(String),
    Object { name: String },
}

impl TagInput {
    pub fn name(&self) -> &str {
        match self {
            TagInput::Name(name) => name,
            TagInput::Object { name } => name,
        }
    }
}

/// 태그 입력 목록을 정규화합니다: 앞뒤 공백 제거, 빈 이름 제외, 중복 제거(입력 순서 유지).
pub fn normalize_tag_names(tags: &[TagInput]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let name = tag.name().trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub doc_type: String,
    #[serde(default, alias = "serviceId")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    #[serde(default)]
    pub is_published: bool,
}

impl CreateDocumentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        Ok(())
    }
}

/// 문서 수정 요청 (`PUT /api/documents/{id}`)
///
/// 보낸 필드만 변경합니다. `service_id`는 세 가지 상태를 구분합니다:
/// 필드 누락 = 변경 안 함, `null` = 연결 해제, 값 = 해당 서비스로 연결.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default, alias = "serviceId", deserialize_with = "double_option")]
    pub service_id: Option<Option<String>>,
    pub tags: Option<Vec<TagInput>>,
    pub is_published: Option<bool>,
}

impl UpdateDocumentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(AppError::BadRequest("Title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// 필드가 존재하면(`null` 포함) `Some(..)`으로 감싸 "누락"과 "null"을 구분합니다.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
