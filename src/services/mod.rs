//! # 서비스(도메인 로직) 계층
//!
//! 라우트 핸들러와 DB 접근 계층 사이의 얇은 로직입니다.
//! - `auth`: 회원가입, 로그인(토큰 발급), 프로필 수정
//! - `documents`: 문서 생성/수정/삭제, 태그 연결, 버전 기록, 응답 조립
//! - `password`: Argon2id 비밀번호 해싱/검증

pub mod auth;
pub mod documents;
pub mod password;
