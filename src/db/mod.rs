//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)과 라우트 핸들러(routes/)가 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `comments`: 문서 댓글 쿼리
//! - `documents`: 문서 CRUD 및 작성자/카테고리/태그별 조회
//! - `services`: 서비스 엔티티 CRUD
//! - `tags`: 태그 생성 및 문서-태그 관계 쿼리
//! - `users`: 사용자 계정 쿼리
//! - `versions`: 문서 버전 스냅샷 쿼리
//!
//! soft delete 대상 테이블(users, documents, services, comments)은
//! 행을 지우지 않고 `deleted_at`을 기록하며, 모든 조회는 `deleted_at IS NULL`로 거릅니다.

pub mod comments;
pub mod documents;
pub mod services;
pub mod tags;
pub mod users;
pub mod versions;

pub use comments::*;
pub use documents::*;
pub use services::*;
pub use tags::*;
pub use versions::*;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// 연결 풀을 만들고 마이그레이션을 적용합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// 테스트용 인메모리 DB. `:memory:`는 연결마다 별도 DB이므로 연결을 1개로 제한합니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
