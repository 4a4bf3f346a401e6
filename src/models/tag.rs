//! # 태그 모델 정의
//!
//! 태그(Tag)는 문서를 분류하기 위한 라벨입니다.
//! 문서 생성/수정 시 함께 보낸 이름으로 자동 생성되며,
//! `document_tags` 중간 테이블을 통해 문서와 다대다(N:M)로 연결됩니다.

use serde::{Deserialize, Serialize};

/// 태그 엔티티 — DB의 `tags` 테이블 한 행(row)에 대응합니다.
///
/// - `sqlx::FromRow`: SQL 쿼리 결과(행)를 이 구조체로 자동 매핑합니다
/// - `Serialize`/`Deserialize`: API 응답 및 테스트에서 JSON 변환에 사용됩니다
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 태그 이름 (UNIQUE)
    pub name: String,
}
