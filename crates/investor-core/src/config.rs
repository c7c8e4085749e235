//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 외부 데이터 제공자 설정
    #[serde(default)]
    pub providers: ProviderConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 데이터베이스 연결 풀 설정.
///
/// 접속 URL은 설정 파일에 저장하지 않고 `DATABASE_URL` 환경변수에서 읽습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 외부 데이터 제공자 설정.
///
/// base URL은 테스트에서 mock 서버로 교체할 수 있도록 설정으로 분리합니다.
/// API 키는 세션마다 사용자가 직접 입력하며 설정/스토어에 저장하지 않습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Finnhub API base URL (시세 + 기업 뉴스)
    pub finnhub_base_url: String,
    /// TheNewsAPI base URL (매크로 뉴스 검색)
    pub macro_news_base_url: String,
    /// 기업 뉴스 조회 기간 (일)
    #[serde(default = "default_news_lookback_days")]
    pub company_news_lookback_days: i64,
    /// 기업 뉴스 캐시 신선도 윈도우 (시간)
    #[serde(default = "default_news_freshness_hours")]
    pub company_news_freshness_hours: i64,
    /// 가격 스냅샷 보존 기간 (일) - 기동 시 이보다 오래된 행을 정리
    #[serde(default = "default_price_retention_days")]
    pub price_retention_days: i64,
}

fn default_news_lookback_days() -> i64 {
    7
}
fn default_news_freshness_hours() -> i64 {
    24
}
fn default_price_retention_days() -> i64 {
    365
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            finnhub_base_url: "https://finnhub.io/api/v1".to_string(),
            macro_news_base_url: "https://api.thenewsapi.com".to_string(),
            company_news_lookback_days: default_news_lookback_days(),
            company_news_freshness_hours: default_news_freshness_hours(),
            price_retention_days: default_price_retention_days(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("INVESTOR")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 설정 파일이 있으면 로드하고, 없으면 기본값 + 환경 변수를 사용합니다.
    pub fn load_or_default() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("INVESTOR")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        // 파일/환경변수에 없는 섹션은 serde default로 채워짐
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.providers.company_news_lookback_days, 7);
        assert_eq!(config.providers.company_news_freshness_hours, 24);
        assert_eq!(config.providers.price_retention_days, 365);
        assert!(config.providers.finnhub_base_url.starts_with("https://"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(
            parsed.providers.finnhub_base_url,
            config.providers.finnhub_base_url
        );
    }
}
