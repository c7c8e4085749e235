//! Finnhub API 클라이언트.
//!
//! 시세(quote)와 기업 뉴스(company news)를 Finnhub에서 조회합니다.
//!
//! ## 엔드포인트
//! - `/quote`: 현재가 (`c` 필드). `c`가 없거나 0이면 잘못된 티커로 간주
//! - `/company-news`: 기간 내 기업 뉴스 기사 배열
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = FinnhubClient::new("https://finnhub.io/api/v1");
//! let quote = client.quote("AAPL", "my-token").await?;
//! println!("AAPL 현재가: {}", quote.price_decimal().unwrap());
//! ```

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::error::DataError;

/// Finnhub 클라이언트 에러.
#[derive(Debug, Error)]
pub enum FinnhubError {
    #[error("HTTP 요청 실패: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Finnhub HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("응답 파싱 실패: {0}")]
    ParseError(String),

    #[error("데이터 없음: {0}")]
    NoData(String),

    #[error("Rate limit 초과")]
    RateLimited,
}

impl From<FinnhubError> for DataError {
    fn from(err: FinnhubError) -> Self {
        match err {
            FinnhubError::HttpError(e) => e.into(),
            FinnhubError::ApiError { status, body } => {
                DataError::FetchError(format!("Finnhub HTTP {}: {}", status, body))
            }
            FinnhubError::ParseError(msg) => DataError::ParseError(msg),
            FinnhubError::NoData(msg) => DataError::InvalidData(msg),
            FinnhubError::RateLimited => {
                DataError::FetchError("Finnhub rate limit exceeded".to_string())
            }
        }
    }
}

/// Finnhub `/quote` 응답.
///
/// `c`가 핵심 필드이며, 존재하지 않는 티커에 대해서는 0으로 내려옵니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubQuote {
    /// 현재가
    #[serde(default)]
    pub c: f64,
    /// 전일 대비 변동
    #[serde(default)]
    pub d: Option<f64>,
    /// 전일 대비 변동률 (%)
    #[serde(default)]
    pub dp: Option<f64>,
    /// 당일 고가
    #[serde(default)]
    pub h: f64,
    /// 당일 저가
    #[serde(default)]
    pub l: f64,
    /// 당일 시가
    #[serde(default)]
    pub o: f64,
    /// 전일 종가
    #[serde(default)]
    pub pc: f64,
}

impl FinnhubQuote {
    /// 현재가가 유효한지 확인합니다 (없거나 0이면 무효).
    pub fn has_price(&self) -> bool {
        self.c > 0.0
    }

    /// 현재가를 Decimal로 변환합니다 (소수점 4자리 반올림).
    ///
    /// NUMERIC(20, 4) 컬럼에 저장 가능하도록 정밀도를 제한합니다.
    pub fn price_decimal(&self) -> Option<Decimal> {
        if !self.has_price() {
            return None;
        }
        Decimal::from_f64(self.c).map(|d| d.round_dp(4))
    }
}

/// Finnhub 기업 뉴스 기사.
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubArticle {
    /// 기사 제목
    pub headline: String,
    /// 기사 요약
    #[serde(default)]
    pub summary: String,
    /// 기사 원문 URL (중복 제거 키)
    pub url: String,
    /// 기사 출처 매체
    #[serde(default)]
    pub source: Option<String>,
    /// 게시 시각 (Unix timestamp)
    #[serde(default)]
    pub datetime: Option<i64>,
}

/// Finnhub API 클라이언트.
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
}

impl FinnhubClient {
    /// 새 클라이언트 생성.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (예: "https://finnhub.io/api/v1")
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

    /// 현재가 조회.
    ///
    /// 응답의 `c` 필드가 없거나 0이면 `NoData` 에러를 반환합니다.
    ///
    /// # Arguments
    /// * `ticker` - 티커 심볼 (예: "AAPL")
    /// * `token` - 호출자가 전달하는 API 키
    pub async fn quote(&self, ticker: &str, token: &str) -> Result<FinnhubQuote, FinnhubError> {
        let url = format!("{}/quote", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", ticker), ("token", token)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FinnhubError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FinnhubError::ApiError { status, body });
        }

        let quote: FinnhubQuote = response
            .json()
            .await
            .map_err(|e| FinnhubError::ParseError(e.to_string()))?;

        if !quote.has_price() {
            return Err(FinnhubError::NoData(format!(
                "티커 {} 시세 없음 (잘못된 심볼 또는 빈 응답)",
                ticker
            )));
        }

        debug!(ticker = ticker, price = quote.c, "Finnhub 시세 수신");
        Ok(quote)
    }

    /// 기업 뉴스 조회.
    ///
    /// 빈 배열 응답은 에러로 처리합니다 (저장할 기사 없음).
    ///
    /// # Arguments
    /// * `ticker` - 티커 심볼
    /// * `token` - API 키
    /// * `from` / `to` - 조회 기간 (YYYY-MM-DD)
    pub async fn company_news(
        &self,
        ticker: &str,
        token: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinnhubArticle>, FinnhubError> {
        let url = format!("{}/company-news", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", ticker),
                ("from", &from.format("%Y-%m-%d").to_string()),
                ("to", &to.format("%Y-%m-%d").to_string()),
                ("token", token),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FinnhubError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FinnhubError::ApiError { status, body });
        }

        let articles: Vec<FinnhubArticle> = response
            .json()
            .await
            .map_err(|e| FinnhubError::ParseError(e.to_string()))?;

        if articles.is_empty() {
            return Err(FinnhubError::NoData(format!(
                "티커 {} 기간 내 뉴스 없음 ({} ~ {})",
                ticker, from, to
            )));
        }

        debug!(ticker = ticker, count = articles.len(), "Finnhub 기업 뉴스 수신");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_price_decimal() {
        let quote = FinnhubQuote {
            c: 189.5,
            ..Default::default()
        };
        assert!(quote.has_price());
        assert_eq!(quote.price_decimal(), Some(dec!(189.5)));
    }

    #[test]
    fn test_quote_without_price() {
        // 잘못된 티커에 대해 Finnhub은 c=0을 반환
        let quote = FinnhubQuote::default();
        assert!(!quote.has_price());
        assert_eq!(quote.price_decimal(), None);
    }

    #[tokio::test]
    async fn test_quote_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("symbol".into(), "AAPL".into()),
                mockito::Matcher::UrlEncoded("token".into(), "test-token".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"c":189.5,"d":1.2,"dp":0.64,"h":190.1,"l":187.3,"o":188.0,"pc":188.3}"#)
            .create_async()
            .await;

        let client = FinnhubClient::new(server.url());
        let quote = client.quote("AAPL", "test-token").await.unwrap();

        assert_eq!(quote.price_decimal(), Some(dec!(189.5)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_quote_invalid_ticker_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0}"#)
            .create_async()
            .await;

        let client = FinnhubClient::new(server.url());
        let result = client.quote("NOTREAL", "test-token").await;

        assert!(matches!(result, Err(FinnhubError::NoData(_))));
    }

    #[tokio::test]
    async fn test_company_news_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/company-news")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"headline":"Apple ships new device","summary":"Details inside","url":"https://news.example.com/a1","source":"Reuters","datetime":1700000000},
                    {"headline":"Supply chain update","summary":"","url":"https://news.example.com/a2"}
                ]"#,
            )
            .create_async()
            .await;

        let client = FinnhubClient::new(server.url());
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let articles = client
            .company_news("AAPL", "test-token", from, to)
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].headline, "Apple ships new device");
        assert_eq!(articles[1].summary, "");
        assert_eq!(articles[1].url, "https://news.example.com/a2");
    }

    #[tokio::test]
    async fn test_company_news_empty_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/company-news")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = FinnhubClient::new(server.url());
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let result = client.company_news("AAPL", "test-token", from, to).await;

        assert!(matches!(result, Err(FinnhubError::NoData(_))));
    }

    #[tokio::test]
    async fn test_quote_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":"Invalid API key"}"#)
            .create_async()
            .await;

        let client = FinnhubClient::new(server.url());
        let result = client.quote("AAPL", "bad-token").await;

        assert!(matches!(
            result,
            Err(FinnhubError::ApiError { status: 401, .. })
        ));
    }
}
