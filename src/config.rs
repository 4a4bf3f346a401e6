//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져오며, 모든 항목에 기본값이 있습니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 연결 문자열 (없으면 `DB_NAME`으로 생성)
//! - `DB_NAME`: 데이터베이스 이름 (기본값: "techdocs" → `data/techdocs.db`)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키
//! - `JWT_EXPIRATION_HOURS`: 토큰 유효 시간 (기본값: 24)
//! - `HOST`: 서버 바인딩 주소
//! - `SERVER_PORT`: 서버 포트 번호 (기본값: 8081)

use std::env; // 표준 라이브러리의 환경변수 접근 모듈

/// JWT_SECRET이 없을 때 쓰는 기본 비밀키. 운영 환경에서는 반드시 덮어써야 합니다.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// `#[derive(...)]`는 컴파일러가 트레이트 구현을 자동 생성하게 합니다:
/// - `Debug`: `{:?}`로 출력 가능 (디버깅용)
/// - `Clone`: `.clone()`으로 깊은 복사 가능 (main에서 jwt_secret을 AppState로 넘길 때 사용)
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 연결 문자열 (예: "sqlite:data/techdocs.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 발급한 토큰의 유효 시간 (시간 단위)
    pub jwt_expiration_hours: i64,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8081). u16이라 0~65535 밖의 값은 파싱 단계에서 걸러집니다.
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 값이 없거나 파싱에 실패하면 기본값을 사용하므로 실패하지 않습니다.
    pub fn from_env() -> Self {
        // env::var()는 Result<String, VarError>를 반환합니다.
        // .ok()로 Option<String>으로 바꿔 "없음"과 "잘못된 유니코드"를 똑같이 None으로 취급합니다.
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 구성합니다 (테스트에서 환경변수 대신 사용).
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열도 "설정 안 됨"으로 취급합니다.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // unwrap_or_else(|| ...): None일 때만 클로저를 실행해 기본값을 만듭니다.
        // DATABASE_URL이 우선이고, 없으면 DB_NAME으로 파일 경로를 조립합니다.
        let database_url = var("DATABASE_URL").unwrap_or_else(|| {
            let name = var("DB_NAME").unwrap_or_else(|| "techdocs".to_string());
            format!("sqlite:data/{}.db?mode=rwc", name)
        });

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET is not set, falling back to the default secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            database_url,
            jwt_secret,
            // and_then: Some일 때만 파싱을 시도합니다. 파싱 실패(.ok() → None)나
            // 0 이하의 값은 filter에서 걸러져 기본값 24로 떨어집니다.
            jwt_expiration_hours: var("JWT_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(24),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            // parse()의 대상 타입은 필드 타입(u16)에서 추론됩니다.
            port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8081),
        }
    }
}
