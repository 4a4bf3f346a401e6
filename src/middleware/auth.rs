//! # 인증/인가 미들웨어
//!
//! - `require_auth`: `Authorization: Bearer <JWT>` 헤더를 검증하고,
//!   성공하면 `AuthUser`를 요청 extensions에 넣습니다. 실패 시 401.
//! - `require_role`: 호출자의 역할이 요구 역할과 다르면 403.
//! - `AuthUser` 추출기: 핸들러에서 `auth_user: AuthUser`로 호출자 정보를 꺼냅니다.
//!
//! 토큰은 만료될 때까지 무조건 유효합니다 (refresh/폐기 목록 없음).

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::models::{Role, User};
use crate::routes::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// 인증된 호출자 — 요청 범위에서만 유효한 신원 정보
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role.as_str()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// `require_auth`가 넣어 둔 신원을 꺼냅니다. 레이어 밖에서 쓰이면 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Authorization token has expired")]
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// 인증 미들웨어 — 보호된 라우트 그룹에 `route_layer`로 붙입니다.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = bearer_token(request.headers())
        .and_then(|token| verify_access_token(token, &state.jwt_secret))
        .inspect_err(|e| {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e)
        })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// 역할 검사 미들웨어 — 상태(State)로 요구 역할을 받습니다.
///
/// ```ignore
/// .route_layer(axum::middleware::from_fn_with_state(Role::Admin, require_role))
/// ```
/// `require_auth`보다 안쪽(나중)에 실행되어야 합니다.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !user.has_role(required) {
        tracing::warn!(
            "User {} ({}) with role '{}' denied access to {} (requires '{}')",
            user.username,
            user.user_id,
            user.role,
            request.uri().path(),
            required
        );
        return Err(AppError::Forbidden(format!("{} role required", required)));
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

pub fn create_access_token(
    user: &User,
    secret: &str,
    expiration_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiration_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(role: &str) -> User {
        User {
            id: "u1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            role: role.into(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let token = create_access_token(&user("admin"), "secret", 1).unwrap();
        let claims = verify_access_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);

        let auth = AuthUser::from(claims);
        assert!(auth.has_role(Role::Admin));
        assert!(!auth.has_role(Role::User));
    }

    #[test]
    fn wrong_secret_and_garbage_are_invalid() {
        let token = create_access_token(&user("user"), "secret", 1).unwrap();
        assert!(matches!(
            verify_access_token(&token, "other"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            verify_access_token("not.a.jwt", "secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // 기본 Validation의 leeway(60초)를 넘도록 충분히 과거로 설정
        let token = create_access_token(&user("user"), "secret", -2).unwrap();
        assert!(matches!(
            verify_access_token(&token, "secret"),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }
}
