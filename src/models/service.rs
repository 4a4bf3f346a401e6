//! # 서비스 모델 정의
//!
//! 서비스(Service)는 문서가 선택적으로 참조하는 보조 엔티티입니다.
//! 예: "Asterisk", "Clickhouse" 같은 운영 대상 시스템

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 서비스 생성 요청 — `POST /api/services`
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub category: Option<String>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Service name is required".to_string()));
        }
        Ok(())
    }
}

/// 서비스 수정 요청 — `PUT /api/services/{id}`
///
/// None인 필드는 변경하지 않습니다.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::BadRequest("Service name must not be empty".to_string()));
        }
        Ok(())
    }
}
