//! # techdocs 웹 서버 진입점
//!
//! 이 파일은 techdocs 문서 관리 서버의 **시작점(entry point)**입니다.
//! 바이너리 크레이트는 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정(Config) 읽기
//! 4. SQLite 데이터 디렉토리 준비
//! 5. 연결 풀 생성 및 마이그레이션 실행
//! 6. 애플리케이션 상태(AppState)와 라우터 구성
//! 7. CORS / HTTP 로깅 미들웨어 적용
//! 8. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod config;`는 같은 디렉토리의 `config.rs`를, `mod db;`는 `db/mod.rs`를 가져옵니다.
// 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

// ── 외부 크레이트 및 모듈에서 필요한 항목 가져오기 ──
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result (main 전용)
use config::Config; // 환경변수 기반 설정
use routes::AppState; // 모든 핸들러가 공유하는 상태 (DB 풀, JWT 설정)
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 자동 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: main을 Tokio 비동기 런타임 안에서 실행하게 해 주는 어트리뷰트 매크로.
// 이 덕분에 main 안에서 `.await`를 쓸 수 있습니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일의 값을 프로세스 환경변수로 올립니다 (DATABASE_URL, JWT_SECRET 등).
    // .ok()로 Result를 버리므로 .env 파일이 없어도 그대로 진행합니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry()에 필터 레이어와 출력 레이어를 차례로 쌓습니다.
    tracing_subscriber::registry()
        .with(
            // RUST_LOG 환경변수가 있으면 그 값을, 없으면 기본 필터를 씁니다.
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "techdocs=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // 모든 항목에 기본값이 있으므로 from_env()는 실패하지 않습니다.
    let config = Config::from_env();
    tracing::info!("Starting techdocs server on {}:{}", config.host, config.port);

    // ── 4단계: 데이터 디렉토리 준비 ──
    // `sqlite:data/techdocs.db?mode=rwc`의 `mode=rwc`는 파일은 만들어 주지만
    // 상위 디렉토리(`data/`)까지 만들지는 않습니다.
    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        // create_dir_all: 중간 디렉토리까지 모두 생성 (mkdir -p와 같음)
        tokio::fs::create_dir_all(dir).await?;
    }

    // ── 5단계: 연결 풀 생성 + 마이그레이션 ──
    // 최대 5개의 연결을 재사용합니다. 마이그레이션은 connect() 안에서 실행됩니다.
    let pool = db::connect(&config.database_url, 5).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // SqlitePool은 내부적으로 Arc이므로, 핸들러마다 clone되어도 같은 풀을 가리킵니다.
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        jwt_expiration_hours: config.jwt_expiration_hours,
    };

    // ── 7단계: CORS 미들웨어 설정 ──
    // 브라우저의 다른 출처(origin)에서 API를 호출할 수 있도록 모두 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)  // 모든 출처 허용
        .allow_methods(Any) // 모든 HTTP 메서드 허용
        .allow_headers(Any); // 모든 헤더 허용 (Authorization 포함)

    // 라우트 구성은 routes::router()에 있습니다.
    // .layer(): 라우터 전체를 감싸는 미들웨어를 추가합니다.
    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // 요청/응답 자동 로깅

    // ── 8단계: 서버 시작 ──
    // TcpListener::bind(): 지정한 주소에서 연결을 기다리는 소켓을 엽니다.
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): Ctrl+C로 종료할 때까지 요청을 처리합니다.
    axum::serve(listener, app).await?;

    // Ok(()): 성공. ()는 "빈 값"(unit 타입)입니다.
    Ok(())
}

/// `sqlite:data/techdocs.db?mode=rwc` → `Some("data")`. 메모리 DB나 디렉토리 없는 경로는 `None`.
fn sqlite_parent_dir(database_url: &str) -> Option<&str> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.starts_with(":memory:") {
        return None;
    }
    let (dir, _) = path.rsplit_once('/')?;
    (!dir.is_empty()).then_some(dir)
}
