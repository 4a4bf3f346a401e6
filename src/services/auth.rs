//! # 사용자 인증 서비스
//!
//! 회원가입, 로그인(토큰 발급), 프로필 수정을 처리합니다.
//! 비밀번호는 어떤 경로로든 DB에 저장되기 전에 해싱됩니다.

use sqlx::SqlitePool;

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::create_access_token,
    models::user::*,
    services::password::{hash_password, verify_dummy_password, verify_password},
};

/// 새 사용자를 `"user"` 역할로 등록합니다.
///
/// 사용자명 또는 이메일이 이미 있으면 `AppError::Conflict`.
pub async fn register(pool: &SqlitePool, req: &RegisterRequest) -> Result<User, AppError> {
    req.validate()?;
    let username = req.username.trim();
    let email = req.email.trim();

    if db_users::username_exists(pool, username).await? {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }
    if db_users::email_exists(pool, email).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user =
        db_users::create_user(pool, &user_id, username, email, &password_hash, Role::User).await?;

    tracing::info!("User registered: {} ({})", user.username, user.id);
    Ok(user)
}

/// 자격 증명을 확인하고 서명된 토큰을 발급합니다.
///
/// 사용자 부재와 비밀번호 불일치는 같은 에러로 응답하여 어느 쪽인지 드러내지 않습니다.
pub async fn login(
    pool: &SqlitePool,
    req: &LoginRequest,
    jwt_secret: &str,
    expiration_hours: i64,
) -> Result<LoginResponse, AppError> {
    req.validate()?;

    let Some(user) = db_users::find_by_username(pool, req.username.trim()).await? else {
        // 없는 사용자도 비밀번호 검증 비용을 똑같이 치러야 응답 시간이 같아집니다
        verify_dummy_password(&req.password);
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::warn!("Failed login attempt for user {}", user.id);
        return Err(AppError::invalid_credentials());
    }

    let token = create_access_token(&user, jwt_secret, expiration_hours)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    tracing::info!("User logged in: {} ({})", user.username, user.id);
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

/// 이메일 및/또는 비밀번호를 변경합니다. 새 비밀번호는 저장 전에 해싱합니다.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    req: &UpdateProfileRequest,
) -> Result<User, AppError> {
    req.validate()?;

    let email = req.email.as_deref().map(str::trim);
    let password_hash = req.password.as_deref().map(hash_password).transpose()?;

    db_users::update_user(pool, user_id, email, password_hash.as_deref())
        .await?
        .ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::middleware::auth::verify_access_token;

    fn register_req(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    fn login_req(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_before_storing() {
        let pool = test_pool().await;
        let user = register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        assert_eq!(user.role, "user");
        assert_ne!(user.password_hash, "password123");
        assert!(verify_password("password123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_is_conflict() {
        let pool = test_pool().await;
        register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        let same_name = register(&pool, &register_req("alice", "other@example.com")).await;
        assert!(matches!(same_name, Err(AppError::Conflict(_))));

        let same_email = register(&pool, &register_req("bob", "alice@example.com")).await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_identity() {
        let pool = test_pool().await;
        let user = register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        let resp = login(&pool, &login_req("alice", "password123"), "secret", 1).await.unwrap();
        assert_eq!(resp.user.id, user.id);

        let claims = verify_access_token(&resp.token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let pool = test_pool().await;
        register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        let wrong_password = login(&pool, &login_req("alice", "nope-nope"), "secret", 1)
            .await
            .unwrap_err();
        let unknown_user = login(&pool, &login_req("mallory", "password123"), "secret", 1)
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_pays_the_same_hashing_cost() {
        use std::time::Instant;

        let pool = test_pool().await;
        register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();
        // 더미 해시 생성 비용을 측정에서 제외
        verify_dummy_password("warm-up");

        let started = Instant::now();
        let _ = login(&pool, &login_req("alice", "nope-nope"), "secret", 1).await;
        let wrong_password = started.elapsed();

        let started = Instant::now();
        let _ = login(&pool, &login_req("mallory", "nope-nope"), "secret", 1).await;
        let unknown_user = started.elapsed();

        // Argon2 검증을 건너뛰면 DB 조회만 하므로 수십 배 빨라집니다
        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user {unknown_user:?} vs wrong password {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn test_case_variant_registration_is_conflict() {
        let pool = test_pool().await;
        register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        let variant = register(&pool, &register_req("Alice", "ALICE@example.com")).await;
        assert!(matches!(variant, Err(AppError::Conflict(_))));

        let resp = login(&pool, &login_req("ALICE", "password123"), "secret", 1).await.unwrap();
        assert_eq!(resp.user.username, "alice");
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_password() {
        let pool = test_pool().await;
        let user = register(&pool, &register_req("alice", "alice@example.com")).await.unwrap();

        let req = UpdateProfileRequest {
            email: Some("alice@new.example.com".to_string()),
            password: Some("brand-new-pass".to_string()),
        };
        let updated = update_profile(&pool, &user.id, &req).await.unwrap();
        assert_eq!(updated.email, "alice@new.example.com");
        assert!(verify_password("brand-new-pass", &updated.password_hash).unwrap());

        assert!(login(&pool, &login_req("alice", "password123"), "secret", 1).await.is_err());
        assert!(login(&pool, &login_req("alice", "brand-new-pass"), "secret", 1).await.is_ok());
    }
}
