use serde::{Deserialize, Serialize};

/// 문서 수정 직전 내용의 스냅샷
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentVersion {
    pub id: String,
    pub document_id: String,
    pub version: i64,
    pub content: String,
    pub created_by: String,
    pub created_at: String,
}
