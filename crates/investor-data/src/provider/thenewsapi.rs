//! TheNewsAPI 클라이언트.
//!
//! 자유 검색어(테마) 기반 매크로 뉴스를 조회합니다.
//! 응답은 `{"data": [...]}` 형태이며 기사마다 `title`, `description`,
//! `url`을 포함합니다.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::error::DataError;

/// TheNewsAPI 클라이언트 에러.
#[derive(Debug, Error)]
pub enum MacroNewsError {
    #[error("HTTP 요청 실패: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("TheNewsAPI HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("응답 파싱 실패: {0}")]
    ParseError(String),

    #[error("데이터 없음: {0}")]
    NoData(String),
}

impl From<MacroNewsError> for DataError {
    fn from(err: MacroNewsError) -> Self {
        match err {
            MacroNewsError::HttpError(e) => e.into(),
            MacroNewsError::ApiError { status, body } => {
                DataError::FetchError(format!("TheNewsAPI HTTP {}: {}", status, body))
            }
            MacroNewsError::ParseError(msg) => DataError::ParseError(msg),
            MacroNewsError::NoData(msg) => DataError::InvalidData(msg),
        }
    }
}

/// 매크로 뉴스 기사.
#[derive(Debug, Clone, Deserialize)]
pub struct MacroArticle {
    /// 기사 제목
    pub title: String,
    /// 기사 요약
    #[serde(default)]
    pub description: String,
    /// 기사 원문 URL (중복 제거 키)
    pub url: String,
}

/// `/v1/news/all` 응답 래퍼.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<MacroArticle>,
}

/// TheNewsAPI 클라이언트.
#[derive(Clone)]
pub struct TheNewsApiClient {
    client: Client,
    base_url: String,
}

impl TheNewsApiClient {
    /// 새 클라이언트 생성.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (예: "https://api.thenewsapi.com")
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 테마 검색.
    ///
    /// `data` 배열이 비어 있으면 에러로 처리합니다.
    ///
    /// # Arguments
    /// * `theme` - 자유 검색어 (예: "Inflation")
    /// * `token` - 호출자가 전달하는 API 키
    pub async fn search(&self, theme: &str, token: &str) -> Result<Vec<MacroArticle>, MacroNewsError> {
        let url = format!("{}/v1/news/all", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search", theme),
                ("api_token", token),
                ("language", "en"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MacroNewsError::ApiError { status, body });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| MacroNewsError::ParseError(e.to_string()))?;

        if parsed.data.is_empty() {
            return Err(MacroNewsError::NoData(format!(
                "테마 '{}' 검색 결과 없음",
                theme
            )));
        }

        debug!(theme = theme, count = parsed.data.len(), "매크로 뉴스 수신");
        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/news/all")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("search".into(), "Inflation".into()),
                mockito::Matcher::UrlEncoded("api_token".into(), "test-token".into()),
                mockito::Matcher::UrlEncoded("language".into(), "en".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"title":"A","description":"B","url":"u1"}]}"#)
            .create_async()
            .await;

        let client = TheNewsApiClient::new(server.url());
        let articles = client.search("Inflation", "test-token").await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].description, "B");
        assert_eq!(articles[0].url, "u1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_empty_data_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/news/all")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = TheNewsApiClient::new(server.url());
        let result = client.search("Obscure theme", "test-token").await;

        assert!(matches!(result, Err(MacroNewsError::NoData(_))));
    }

    #[tokio::test]
    async fn test_search_missing_data_field_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/news/all")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meta":{"found":0}}"#)
            .create_async()
            .await;

        let client = TheNewsApiClient::new(server.url());
        let result = client.search("Inflation", "test-token").await;

        // data 필드가 없으면 빈 배열로 처리되어 NoData
        assert!(matches!(result, Err(MacroNewsError::NoData(_))));
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/news/all")
            .match_query(mockito::Matcher::Any)
            .with_status(402)
            .with_body(r#"{"error":{"code":"usage_limit_reached"}}"#)
            .create_async()
            .await;

        let client = TheNewsApiClient::new(server.url());
        let result = client.search("Inflation", "test-token").await;

        assert!(matches!(
            result,
            Err(MacroNewsError::ApiError { status: 402, .. })
        ));
    }
}
