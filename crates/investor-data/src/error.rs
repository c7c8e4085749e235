//! 데이터 모듈 오류 타입.

use investor_core::InvestorError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 중복 레코드
    #[error("Duplicate record: {0}")]
    DuplicateError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// API 자격증명 누락 (호출 전 사전조건 실패)
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 마이그레이션 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 연결 풀 소진
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 데이터 삽입 오류
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 데이터 삭제 오류
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                if code == "23505" {
                    // PostgreSQL 고유 제약 조건 위반
                    DataError::DuplicateError(db_err.message().to_string())
                } else {
                    DataError::QueryError(db_err.message().to_string())
                }
            }
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for InvestorError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::MissingCredential(msg) => InvestorError::MissingCredential(msg),
            DataError::InvalidData(msg) => InvestorError::Provider(msg),
            DataError::FetchError(msg) | DataError::Timeout(msg) => InvestorError::Network(msg),
            DataError::ParseError(msg) => InvestorError::Parse(msg),
            DataError::NotFound(msg) => InvestorError::NotFound(msg),
            DataError::SerializationError(msg) => InvestorError::Serialization(msg),
            DataError::ConfigError(msg) => InvestorError::Config(msg),
            other => InvestorError::Database(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_maps_to_precondition() {
        let err: InvestorError = DataError::MissingCredential("Finnhub".to_string()).into();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_fetch_error_maps_to_provider_failure() {
        let err: InvestorError = DataError::FetchError("connection reset".to_string()).into();
        assert!(err.is_provider_failure());

        let err: InvestorError = DataError::QueryError("syntax".to_string()).into();
        assert!(!err.is_provider_failure());
    }
}
