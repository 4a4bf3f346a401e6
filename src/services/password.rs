//! # 비밀번호 해싱 서비스
//!
//! Argon2id로 비밀번호를 해싱하고 검증합니다.
//! 해시는 PHC 문자열 형식(`$argon2id$v=19$...`)으로, 알고리즘/파라미터/솔트를 모두 포함합니다.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use std::sync::OnceLock;

use crate::error::AppError;

/// 비밀번호를 무작위 솔트와 함께 해싱합니다. DB에 저장하기 전에 반드시 거쳐야 합니다.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// 저장된 해시와 비밀번호가 일치하는지 확인합니다.
///
/// 해시 문자열 자체가 손상된 경우에만 에러를 반환하고, 불일치는 `Ok(false)`입니다.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 존재하지 않는 사용자에 대해서도 실제 사용자와 같은 비용의 검증을 수행합니다.
///
/// 응답 시간으로 사용자명 존재 여부가 드러나지 않도록, 로그인 실패 경로에서 호출합니다.
/// 비교 대상 해시는 프로세스당 한 번만 만들며, 결과는 항상 버립니다.
pub fn verify_dummy_password(password: &str) {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    let hash = DUMMY_HASH
        .get_or_init(|| hash_password("techdocs-dummy-password").unwrap_or_default());
    let _ = verify_password(password, hash);
}
