//! 리소스 리졸버.
//!
//! 리소스 종류별 캐시-조회-저장 시퀀스를 담당합니다.
//!
//! # 동작 방식
//!
//! 1. 요청 시 영속 스토어에서 캐시 확인
//! 2. 캐시 히트면 제공자 호출 없이 저장된 행 반환
//! 3. 미스면 호출자가 전달한 자격증명으로 외부 제공자 호출
//!    (자격증명이 없으면 네트워크 호출 없이 즉시 실패)
//! 4. 성공 시 스토어에 저장 (가격: insert, 뉴스: provider_url upsert)
//! 5. 저장 후 스토어를 다시 읽어 반환. 반환값은 항상 스토어가 지금
//!    갖고 있는 값이며, 메모리에 남은 제공자 응답이 아님
//!
//! 히트/미스 모두 api_logs에 로그 한 건을 남깁니다. 사전조건 실패
//! (자격증명 누락)는 API 호출이 아니므로 기록하지 않습니다.
//!
//! 실패 시 자동 재시도는 없습니다. 모든 실패는 사용자의 다음 수동
//! 조작을 기다립니다.

use chrono::{Duration, Utc};
use investor_core::{ProviderConfig, ResourceKind};
use tracing::{info, instrument, warn};

use crate::error::{DataError, Result};
use crate::provider::finnhub::FinnhubClient;
use crate::provider::thenewsapi::TheNewsApiClient;
use crate::storage::api_logs::ApiLogRepository;
use crate::storage::news_vault::{NewsArticleInput, NewsArticleRecord, NewsRepository};
use crate::storage::postgres::Database;
use crate::storage::price_cache::{PriceRecord, PriceRepository};

/// resolve 결과.
///
/// 호출자가 캐시 여부를 표시할 수 있도록 레코드와 함께 반환합니다.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub records: T,
    pub was_cached: bool,
}

/// 리소스 리졸버.
///
/// 스토어 연결과 제공자 클라이언트는 프로세스 시작 시 한 번 생성되어
/// 주입됩니다. 자격증명은 매 호출마다 호출자가 전달합니다.
#[derive(Clone)]
pub struct ResourceResolver {
    prices: PriceRepository,
    news: NewsRepository,
    logs: ApiLogRepository,
    finnhub: FinnhubClient,
    macro_news: TheNewsApiClient,
    /// 기업 뉴스 조회 기간 (일)
    news_lookback: Duration,
    /// 기업 뉴스 캐시 신선도 윈도우
    news_freshness: Duration,
}

impl ResourceResolver {
    /// 새 리졸버를 생성합니다.
    pub fn new(db: Database, providers: &ProviderConfig) -> Self {
        Self {
            prices: PriceRepository::new(db.clone()),
            news: NewsRepository::new(db.clone()),
            logs: ApiLogRepository::new(db),
            finnhub: FinnhubClient::new(providers.finnhub_base_url.as_str()),
            macro_news: TheNewsApiClient::new(providers.macro_news_base_url.as_str()),
            news_lookback: Duration::days(providers.company_news_lookback_days),
            news_freshness: Duration::hours(providers.company_news_freshness_hours),
        }
    }

    /// 자격증명 사전조건 확인.
    ///
    /// 비어 있으면 네트워크 호출 전에 즉시 실패합니다.
    fn require_credential<'a>(
        credential: Option<&'a str>,
        kind: ResourceKind,
    ) -> Result<&'a str> {
        match credential.map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(DataError::MissingCredential(format!(
                "{} 호출에 API 키가 필요합니다",
                kind.source()
            ))),
        }
    }

    /// API 사용 로그 기록 (히트/미스 공통).
    async fn log_usage(&self, kind: ResourceKind, endpoint: &str, was_cached: bool) -> Result<()> {
        self.logs.record(kind.api_name(), endpoint, was_cached).await?;
        Ok(())
    }

    // =========================================================================
    // 가격 (신선도 윈도우 없음 - 캐시된 행이 있으면 항상 히트)
    // =========================================================================

    /// 티커의 가격을 해석합니다.
    ///
    /// 캐시된 행이 있으면 최신 행을 반환하고 제공자를 호출하지 않습니다.
    #[instrument(skip(self, credential))]
    pub async fn resolve_price(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<Resolved<PriceRecord>> {
        let ticker = normalize_ticker(ticker)?;

        if let Some(record) = self.prices.latest(&ticker).await? {
            self.log_usage(ResourceKind::Price, "/quote", true).await?;
            info!(ticker = %ticker, price = %record.price, "가격 캐시 히트");
            return Ok(Resolved {
                records: record,
                was_cached: true,
            });
        }

        let record = self.fetch_and_store_price(&ticker, credential).await?;
        Ok(Resolved {
            records: record,
            was_cached: false,
        })
    }

    /// 캐시를 건너뛰고 가격을 강제로 새로 가져옵니다 (수동 새로고침).
    #[instrument(skip(self, credential))]
    pub async fn refresh_price(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<PriceRecord> {
        let ticker = normalize_ticker(ticker)?;
        self.fetch_and_store_price(&ticker, credential).await
    }

    /// 캐시된 최신 가격만 조회합니다 (네트워크/로그 없음).
    pub async fn cached_price(&self, ticker: &str) -> Result<Option<PriceRecord>> {
        let ticker = normalize_ticker(ticker)?;
        self.prices.latest(&ticker).await
    }

    async fn fetch_and_store_price(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<PriceRecord> {
        let token = Self::require_credential(credential, ResourceKind::Price)?;

        let quote = self.finnhub.quote(ticker, token).await?;
        let price = quote.price_decimal().ok_or_else(|| {
            DataError::InvalidData(format!("티커 {} 시세에 유효한 가격 없음", ticker))
        })?;

        // Finnhub quote는 거래량을 제공하지 않으므로 0으로 저장
        self.prices
            .insert(ticker, price, 0, ResourceKind::Price.source())
            .await?;
        self.log_usage(ResourceKind::Price, "/quote", false).await?;

        info!(ticker = %ticker, price = %price, "가격 수집 및 저장 완료");

        // 저장 직후 스토어 재조회 (read-your-write)
        self.prices.latest(ticker).await?.ok_or_else(|| {
            DataError::NotFound(format!("방금 저장한 {} 가격 행을 찾을 수 없음", ticker))
        })
    }

    // =========================================================================
    // 기업 뉴스 (신선도 윈도우 24시간)
    // =========================================================================

    /// 티커의 기업 뉴스를 해석합니다.
    ///
    /// 신선도 윈도우 내에 수집된 기사가 있으면 전부 반환하고 제공자를
    /// 호출하지 않습니다.
    #[instrument(skip(self, credential))]
    pub async fn resolve_company_news(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<Resolved<Vec<NewsArticleRecord>>> {
        let ticker = normalize_ticker(ticker)?;
        let since = Utc::now() - self.news_freshness;

        let cached = self.news.list_for_ticker(&ticker, Some(since)).await?;
        if !cached.is_empty() {
            self.log_usage(ResourceKind::CompanyNews, "/company-news", true)
                .await?;
            info!(ticker = %ticker, count = cached.len(), "기업 뉴스 캐시 히트");
            return Ok(Resolved {
                records: cached,
                was_cached: true,
            });
        }

        let records = self.fetch_and_store_company_news(&ticker, credential).await?;
        Ok(Resolved {
            records,
            was_cached: false,
        })
    }

    /// 캐시를 건너뛰고 기업 뉴스를 강제로 새로 가져옵니다.
    #[instrument(skip(self, credential))]
    pub async fn refresh_company_news(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<Vec<NewsArticleRecord>> {
        let ticker = normalize_ticker(ticker)?;
        self.fetch_and_store_company_news(&ticker, credential).await
    }

    /// 신선도 윈도우 내의 캐시된 기업 뉴스만 조회합니다.
    pub async fn cached_company_news(&self, ticker: &str) -> Result<Vec<NewsArticleRecord>> {
        let ticker = normalize_ticker(ticker)?;
        let since = Utc::now() - self.news_freshness;
        self.news.list_for_ticker(&ticker, Some(since)).await
    }

    async fn fetch_and_store_company_news(
        &self,
        ticker: &str,
        credential: Option<&str>,
    ) -> Result<Vec<NewsArticleRecord>> {
        let token = Self::require_credential(credential, ResourceKind::CompanyNews)?;

        let to = Utc::now().date_naive();
        let from = (Utc::now() - self.news_lookback).date_naive();
        let articles = self.finnhub.company_news(ticker, token, from, to).await?;

        let inputs: Vec<NewsArticleInput> = articles
            .into_iter()
            .map(|a| NewsArticleInput {
                ticker: Some(ticker.to_string()),
                theme: None,
                headline: a.headline,
                content: a.summary,
                provider_url: a.url,
                source: ResourceKind::CompanyNews.source().to_string(),
            })
            .collect();

        let stored = self.news.upsert_batch(&inputs).await?;
        self.log_usage(ResourceKind::CompanyNews, "/company-news", false)
            .await?;

        info!(ticker = %ticker, stored = stored, "기업 뉴스 수집 및 저장 완료");

        // 저장 직후 윈도우 기준으로 재조회
        let since = Utc::now() - self.news_freshness;
        self.news.list_for_ticker(ticker, Some(since)).await
    }

    // =========================================================================
    // 매크로 뉴스 (신선도 윈도우 없음)
    // =========================================================================

    /// 테마의 매크로 뉴스를 해석합니다.
    ///
    /// 저장된 기사가 하나라도 있으면 히트입니다. 갱신은 명시적 검색
    /// 경로([`refresh_macro_news`](Self::refresh_macro_news))로만 일어납니다.
    #[instrument(skip(self, credential))]
    pub async fn resolve_macro_news(
        &self,
        theme: &str,
        credential: Option<&str>,
    ) -> Result<Resolved<Vec<NewsArticleRecord>>> {
        let theme = normalize_theme(theme)?;

        let cached = self.news.list_for_theme(&theme).await?;
        if !cached.is_empty() {
            self.log_usage(ResourceKind::MacroNews, "/v1/news/all", true)
                .await?;
            info!(theme = %theme, count = cached.len(), "매크로 뉴스 캐시 히트");
            return Ok(Resolved {
                records: cached,
                was_cached: true,
            });
        }

        let records = self.fetch_and_store_macro_news(&theme, credential).await?;
        Ok(Resolved {
            records,
            was_cached: false,
        })
    }

    /// 캐시를 건너뛰고 테마를 다시 검색합니다.
    #[instrument(skip(self, credential))]
    pub async fn refresh_macro_news(
        &self,
        theme: &str,
        credential: Option<&str>,
    ) -> Result<Vec<NewsArticleRecord>> {
        let theme = normalize_theme(theme)?;
        self.fetch_and_store_macro_news(&theme, credential).await
    }

    /// 캐시된 매크로 뉴스만 조회합니다.
    pub async fn cached_macro_news(&self, theme: &str) -> Result<Vec<NewsArticleRecord>> {
        let theme = normalize_theme(theme)?;
        self.news.list_for_theme(&theme).await
    }

    async fn fetch_and_store_macro_news(
        &self,
        theme: &str,
        credential: Option<&str>,
    ) -> Result<Vec<NewsArticleRecord>> {
        let token = Self::require_credential(credential, ResourceKind::MacroNews)?;

        let articles = self.macro_news.search(theme, token).await?;

        let inputs: Vec<NewsArticleInput> = articles
            .into_iter()
            .map(|a| NewsArticleInput {
                ticker: None,
                theme: Some(theme.to_string()),
                headline: a.title,
                content: a.description,
                provider_url: a.url,
                source: ResourceKind::MacroNews.source().to_string(),
            })
            .collect();

        let stored = self.news.upsert_batch(&inputs).await?;
        self.log_usage(ResourceKind::MacroNews, "/v1/news/all", false)
            .await?;

        info!(theme = %theme, stored = stored, "매크로 뉴스 수집 및 저장 완료");

        self.news.list_for_theme(theme).await
    }

    /// 오래된 가격 스냅샷 정리 (보존 정책).
    pub async fn cleanup_price_cache(&self, retention_days: i64) -> Result<u64> {
        let deleted = self.prices.cleanup_older_than(retention_days).await?;
        if deleted > 0 {
            warn!(deleted = deleted, "가격 캐시 보존 정책 적용");
        }
        Ok(deleted)
    }
}

/// 티커 입력 정규화 (공백 제거 + 대문자).
fn normalize_ticker(ticker: &str) -> Result<String> {
    let normalized = ticker.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(DataError::InvalidData("티커가 비어 있음".to_string()));
    }
    Ok(normalized)
}

/// 테마 입력 정규화 (공백만 제거 - 검색어는 대소문자 유지).
fn normalize_theme(theme: &str) -> Result<String> {
    let normalized = theme.trim().to_string();
    if normalized.is_empty() {
        return Err(DataError::InvalidData("검색 테마가 비어 있음".to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_credential() {
        assert!(matches!(
            ResourceResolver::require_credential(None, ResourceKind::Price),
            Err(DataError::MissingCredential(_))
        ));
        assert!(matches!(
            ResourceResolver::require_credential(Some(""), ResourceKind::Price),
            Err(DataError::MissingCredential(_))
        ));
        assert!(matches!(
            ResourceResolver::require_credential(Some("   "), ResourceKind::MacroNews),
            Err(DataError::MissingCredential(_))
        ));
        assert_eq!(
            ResourceResolver::require_credential(Some("tok-123"), ResourceKind::Price).unwrap(),
            "tok-123"
        );
        // 앞뒤 공백은 제거됨
        assert_eq!(
            ResourceResolver::require_credential(Some(" tok "), ResourceKind::Price).unwrap(),
            "tok"
        );
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("MSFT").unwrap(), "MSFT");
        assert!(normalize_ticker("  ").is_err());
    }

    #[test]
    fn test_normalize_theme_keeps_case() {
        assert_eq!(normalize_theme(" Inflation ").unwrap(), "Inflation");
        assert!(normalize_theme("").is_err());
    }
}
