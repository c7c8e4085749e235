//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::http::StatusCode;
use axum::Json;
use investor_core::InvestorError;
use investor_data::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "MISSING_CREDENTIAL",
///   "message": "자격증명 누락: Finnhub 호출에 API 키가 필요합니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "MISSING_CREDENTIAL", "PROVIDER_ERROR", "CACHE_MISS")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 계층 에러를 HTTP 응답으로 변환합니다.
///
/// 사전조건 실패는 400, 제공자 실패는 502, 스토어 실패는 500으로
/// 매핑됩니다. 에러 본문은 사람이 읽을 수 있는 메시지만 담습니다.
pub fn from_data_error(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    let core_err: InvestorError = err.into();

    let (status, code) = match &core_err {
        InvestorError::MissingCredential(_) => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
        InvestorError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        InvestorError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        _ if core_err.is_provider_failure() => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
    };

    (status, Json(ApiErrorResponse::new(code, core_err.to_string())))
}

/// 스토어 미연결 상태 응답 (degraded 모드).
pub fn db_unavailable() -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiErrorResponse::new(
            "DB_UNAVAILABLE",
            "영속 스토어에 연결되어 있지 않습니다. DATABASE_URL 설정을 확인하세요.",
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_missing_credential_maps_to_400() {
        let (status, body) =
            from_data_error(DataError::MissingCredential("Finnhub".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MISSING_CREDENTIAL");
    }

    #[test]
    fn test_provider_failure_maps_to_502() {
        let (status, body) = from_data_error(DataError::InvalidData("empty response".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "PROVIDER_ERROR");

        let (status, _) = from_data_error(DataError::FetchError("timeout".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_failure_maps_to_500() {
        let (status, body) = from_data_error(DataError::QueryError("syntax".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DB_ERROR");
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let error = ApiErrorResponse {
            code: "X".to_string(),
            message: "y".to_string(),
            details: None,
            timestamp: None,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(!json.contains("details"));
        assert!(!json.contains("timestamp"));
    }
}
