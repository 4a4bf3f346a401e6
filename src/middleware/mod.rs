//! # 미들웨어 모듈
//!
//! - `auth`: JWT 검증, 요청 범위 신원(`AuthUser`) 주입, 역할 검사

pub mod auth;
