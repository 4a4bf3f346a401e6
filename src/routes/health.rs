//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /health` → `{ "status": "ok" }` (인증 불필요)
//!
//! 로드밸런서나 컨테이너 오케스트레이터의 상태 확인용입니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — DB에 접근하지 않고 고정된 JSON만 반환합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
