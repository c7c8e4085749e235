//! 대시보드 시스템의 에러 타입.
//!
//! 이 모듈은 대시보드 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 대시보드 에러.
#[derive(Debug, Error)]
pub enum InvestorError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// API 자격증명 누락 (네트워크 호출 전에 발생)
    #[error("자격증명 누락: {0}")]
    MissingCredential(String),

    /// 입력 검증 실패
    #[error("잘못된 입력: {0}")]
    Validation(String),

    /// 외부 데이터 제공자 에러 (잘못된 티커, 빈 응답 등)
    #[error("제공자 에러: {0}")]
    Provider(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 대시보드 작업을 위한 Result 타입.
pub type InvestorResult<T> = Result<T, InvestorError>;

impl InvestorError {
    /// 사전조건 실패인지 확인합니다.
    ///
    /// 사전조건 실패는 네트워크/스토어 호출 전에 발생하며,
    /// 외부 API 로그에 기록되지 않습니다.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            InvestorError::MissingCredential(_) | InvestorError::Validation(_)
        )
    }

    /// 외부 제공자 측 실패인지 확인합니다.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            InvestorError::Provider(_) | InvestorError::Network(_) | InvestorError::Parse(_)
        )
    }
}

impl From<serde_json::Error> for InvestorError {
    fn from(err: serde_json::Error) -> Self {
        InvestorError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_precondition() {
        let cred_err = InvestorError::MissingCredential("Finnhub".to_string());
        assert!(cred_err.is_precondition());

        let validation_err = InvestorError::Validation("content is empty".to_string());
        assert!(validation_err.is_precondition());

        let network_err = InvestorError::Network("timeout".to_string());
        assert!(!network_err.is_precondition());
    }

    #[test]
    fn test_error_provider_failure() {
        let provider_err = InvestorError::Provider("empty response".to_string());
        assert!(provider_err.is_provider_failure());

        let db_err = InvestorError::Database("connection refused".to_string());
        assert!(!db_err.is_provider_failure());
    }
}
