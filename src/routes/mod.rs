//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과, 이를 묶는 `router()`를 정의합니다.
//!
//! 각 하위 모듈:
//! - `admin`: 사용자 목록, 역할 변경 (admin 전용)
//! - `auth`: 회원가입, 로그인
//! - `comments`: 문서 댓글
//! - `documents`: 문서 CRUD 및 작성자/카테고리/태그별 조회
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `profile`: 내 정보 조회/수정/삭제
//! - `services`: 서비스 엔티티 CRUD
//! - `tags`: 태그 목록
//! - `versions`: 문서 버전 기록
//!
//! ## 라우트 그룹
//! - 공개: `/health`, `/api/auth/*`
//! - 인증 필요: 나머지 `/api/*` (`require_auth`)
//! - admin 전용: `/api/admin/*` (`require_auth` → `require_role(Role::Admin)`)

pub mod admin;
pub mod auth;
pub mod comments;
pub mod documents;
pub mod health;
pub mod profile;
pub mod services;
pub mod tags;
pub mod versions;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;

use crate::middleware::auth::{require_auth, require_role};
use crate::models::Role;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `#[derive(Clone)]`: axum은 요청마다 상태를 clone해서 핸들러에 넘기므로 Clone이 필수입니다.
/// SqlitePool은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// DB 연결 풀 (최대 연결 수는 main에서 지정)
    pub pool: SqlitePool,
    /// JWT 토큰 서명/검증용 비밀키
    pub jwt_secret: String,
    /// 로그인 시 발급하는 토큰의 유효 시간 (시간 단위)
    pub jwt_expiration_hours: i64,
}

/// 전체 라우터를 구성합니다. CORS/Trace 레이어는 `main`에서 씌웁니다.
pub fn router(state: AppState) -> Router {
    // ── 공개 라우트 (인증 불필요) ──
    // post(handler): 해당 경로의 POST 요청을 handler 함수로 연결합니다.
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // ── 인증 필요 라우트 ──
    // get(..).put(..).delete(..): 같은 경로에 HTTP 메서드별 핸들러를 체이닝합니다.
    // `{id}` 같은 중괄호는 경로 파라미터이며 핸들러에서 Path(id)로 꺼냅니다.
    let protected_routes = Router::new()
        // 내 정보
        .route(
            "/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        // 문서 CRUD
        .route(
            "/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        // 작성자/카테고리/태그별 문서 조회
        .route(
            "/documents/author/{author_id}",
            get(documents::list_documents_by_author),
        )
        .route(
            "/documents/category/{category}",
            get(documents::list_documents_by_category),
        )
        .route("/documents/tag/{name}", get(documents::list_documents_by_tag))
        // 버전 기록과 댓글
        .route(
            "/documents/{id}/versions",
            get(versions::list_document_versions),
        )
        .route(
            "/documents/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/comments/{id}", delete(comments::delete_comment))
        .route("/tags", get(tags::list_tags))
        // 서비스 엔티티
        .route(
            "/services",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/services/{id}",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route(
            "/services/category/{category}",
            get(services::list_services_by_category),
        )
        // route_layer(): 위에 등록한 라우트에만 미들웨어를 적용합니다.
        // (매칭되지 않는 경로는 인증 없이 404로 떨어집니다)
        // state.clone(): 미들웨어도 jwt_secret이 필요하므로 상태 사본을 넘깁니다.
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // ── admin 전용 라우트 ──
    // 나중에 추가한 레이어가 바깥쪽이므로 require_auth가 먼저 실행됩니다
    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/role", put(admin::update_user_role))
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // merge(): 여러 라우터의 경로를 하나로 합칩니다. 각 그룹의 레이어는 그대로 유지됩니다.
    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes);

    // nest("/api", ..): 모든 경로 앞에 "/api" 접두사를 붙입니다.
    // with_state(): 핸들러들이 State<AppState>로 꺼낼 상태를 주입합니다.
    // 이 호출 뒤에야 Router<AppState>가 main에서 serve할 수 있는 Router<()>가 됩니다.
    Router::new()
        .route("/health", get(health::health_check)) // 헬스체크는 /api 밖에 둡니다
        .nest("/api", api_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, test_pool, users as db_users};
    use crate::middleware::auth::create_access_token;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn test_app() -> (Router, SqlitePool) {
        let pool = test_pool().await;
        let state = AppState {
            pool: pool.clone(),
            jwt_secret: SECRET.to_string(),
            jwt_expiration_hours: 24,
        };
        (router(state), pool)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(app: &Router, username: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn login(app: &Router, username: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn register_never_exposes_password_and_rejects_duplicates() {
        let (app, pool) = test_app().await;
        let user = register(&app, "alice").await;

        assert_eq!(user["username"], "alice");
        assert_eq!(user["role"], "user");
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());

        let stored = db_users::find_by_username(&pool, "alice").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn register_validation_errors_are_bad_request() {
        let (app, _) = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "al", "email": "bad", "password": "123" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let (app, _) = test_app().await;
        register(&app, "alice").await;

        let (status_wrong, wrong) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "nope-nope" })),
        )
        .await;
        let (status_unknown, unknown) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "password123" })),
        )
        .await;

        assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
        assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn profile_requires_valid_token() {
        let (app, pool) = test_app().await;
        register(&app, "alice").await;
        let token = login(&app, "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "missing_token");

        let (status, body) =
            send(&app, Method::GET, "/api/profile", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "invalid_token");

        let user = db_users::find_by_username(&pool, "alice").await.unwrap().unwrap();
        let expired = create_access_token(&user, SECRET, -2).unwrap();
        let (status, body) = send(&app, Method::GET, "/api/profile", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "expired_token");

        let forged = create_access_token(&user, "another-secret", 1).unwrap();
        let (status, _) = send(&app, Method::GET, "/api/profile", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn profile_update_rehashes_password_and_delete_hides_account() {
        let (app, _) = test_app().await;
        register(&app, "alice").await;
        let token = login(&app, "alice").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/profile",
            Some(&token),
            Some(json!({ "email": "new@example.com", "password": "brand-new-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "new@example.com");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "brand-new-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_routes_require_admin_role() {
        let (app, pool) = test_app().await;
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;

        let user_token = login(&app, "alice").await;
        let (status, body) =
            send(&app, Method::GET, "/api/admin/users", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "forbidden");

        let (status, _) = send(&app, Method::GET, "/api/admin/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let alice_id = alice["id"].as_str().unwrap();
        db_users::update_user_role(&pool, alice_id, Role::Admin).await.unwrap();
        // 역할은 토큰에 담기므로 다시 로그인해야 반영됩니다
        let admin_token = login(&app, "alice").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/admin/users?page=1&limit=1",
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 1);
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_user_list_survives_huge_page_numbers() {
        let (app, pool) = test_app().await;
        let alice = register(&app, "alice").await;
        db_users::update_user_role(&pool, alice["id"].as_str().unwrap(), Role::Admin)
            .await
            .unwrap();
        let admin_token = login(&app, "alice").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/admin/users?page=9223372036854775807&limit=100",
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["users"].as_array().unwrap().is_empty());
        assert_eq!(body["total"], 1);
        assert_eq!(body["page"], i64::MAX);
    }

    #[tokio::test]
    async fn register_rejects_case_variants_of_existing_accounts() {
        let (app, _) = test_app().await;
        register(&app, "alice").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "Alice",
                "email": "ALICE@example.com",
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn admin_can_change_roles() {
        let (app, pool) = test_app().await;
        let alice = register(&app, "alice").await;
        let bob = register(&app, "bob").await;
        db_users::update_user_role(&pool, alice["id"].as_str().unwrap(), Role::Admin)
            .await
            .unwrap();
        let admin_token = login(&app, "alice").await;

        let uri = format!("/api/admin/users/{}/role", bob["id"].as_str().unwrap());
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&admin_token),
            Some(json!({ "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/admin/users/missing/role",
            Some(&admin_token),
            Some(json!({ "role": "user" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn document_round_trip_and_delete() {
        let (app, _) = test_app().await;
        let alice = register(&app, "alice").await;
        let token = login(&app, "alice").await;

        let (status, service) = send(
            &app,
            Method::POST,
            "/api/services",
            Some(&token),
            Some(json!({ "name": "Clickhouse", "category": "storage" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/documents",
            Some(&token),
            Some(json!({
                "title": "Backups",
                "content": "Run the backup job",
                "category": "ops",
                "type": "runbook",
                "serviceId": service["id"],
                "tags": ["db", { "name": "ops" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["author_id"], alice["id"]);
        assert_eq!(created["version"], 1);

        let uri = format!("/api/documents/{}", created["id"].as_str().unwrap());
        let (status, fetched) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["content"], "Run the backup job");
        assert_eq!(fetched["type"], "runbook");
        assert_eq!(fetched["author"]["username"], "alice");
        assert_eq!(fetched["service"]["name"], "Clickhouse");
        let tags: Vec<&str> = fetched["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["db", "ops"]);

        let (status, by_tag) =
            send(&app, Method::GET, "/api/documents/tag/db", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_tag["documents"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn document_update_bumps_version_and_lists_history() {
        let (app, _) = test_app().await;
        register(&app, "alice").await;
        let token = login(&app, "alice").await;

        let (_, created) = send(
            &app,
            Method::POST,
            "/api/documents",
            Some(&token),
            Some(json!({ "title": "Notes", "content": "first" })),
        )
        .await;
        let uri = format!("/api/documents/{}", created["id"].as_str().unwrap());

        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "content": "second" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["version"], 2);
        assert_eq!(updated["content"], "second");
        assert_eq!(updated["title"], "Notes");

        let (status, body) =
            send(&app, Method::GET, &format!("{uri}/versions"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let versions = body["versions"].as_array().unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0]["version"], 1);
        assert_eq!(versions[0]["content"], "first");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/documents/missing",
            Some(&token),
            Some(json!({ "content": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn comments_can_only_be_deleted_by_author_or_admin() {
        let (app, pool) = test_app().await;
        register(&app, "alice").await;
        let bob = register(&app, "bob").await;
        let alice_token = login(&app, "alice").await;

        let (_, doc) = send(
            &app,
            Method::POST,
            "/api/documents",
            Some(&alice_token),
            Some(json!({ "title": "Doc" })),
        )
        .await;
        let comments_uri = format!("/api/documents/{}/comments", doc["id"].as_str().unwrap());

        let (status, comment) = send(
            &app,
            Method::POST,
            &comments_uri,
            Some(&alice_token),
            Some(json!({ "content": "looks good" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment["username"], "alice");

        let delete_uri = format!("/api/comments/{}", comment["id"].as_str().unwrap());
        let bob_token = login(&app, "bob").await;
        let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        db_users::update_user_role(&pool, bob["id"].as_str().unwrap(), Role::Admin)
            .await
            .unwrap();
        let bob_admin_token = login(&app, "bob").await;
        let (status, _) =
            send(&app, Method::DELETE, &delete_uri, Some(&bob_admin_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, &comments_uri, Some(&alice_token), None).await;
        assert!(body["comments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn services_crud_over_http() {
        let (app, pool) = test_app().await;
        register(&app, "alice").await;
        let token = login(&app, "alice").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/services",
            Some(&token),
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, svc) = send(
            &app,
            Method::POST,
            "/api/services",
            Some(&token),
            Some(json!({ "name": "Asterisk", "category": "telephony" })),
        )
        .await;
        let uri = format!("/api/services/{}", svc["id"].as_str().unwrap());

        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "name": "Asterisk PBX" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Asterisk PBX");

        let (_, by_category) = send(
            &app,
            Method::GET,
            "/api/services/category/telephony",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(by_category["services"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert!(db::list_services(&pool).await.unwrap().is_empty());
    }
}
