//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 엔티티의 데이터 타입을 담당합니다:
//! - `comment`: 문서 댓글
//! - `document`: 문서와 문서 요청/응답 구조체
//! - `service`: 문서가 참조하는 서비스
//! - `tag`: 태그
//! - `user`: 사용자, 역할, 인증 요청
//! - `version`: 문서 버전 스냅샷
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Document`처럼 짧게 접근합니다.

pub mod comment;
pub mod document;
pub mod service;
pub mod tag;
pub mod user;
pub mod version;

pub use comment::*;
pub use document::*;
pub use service::*;
pub use tag::*;
pub use user::*;
pub use version::*;
