//! 뉴스 볼트 저장소.
//!
//! 기업 뉴스와 매크로 뉴스를 한 테이블에 저장합니다. `provider_url`이
//! 중복 제거 키이며, 같은 기사를 다시 가져오면 행을 추가하는 대신
//! 내용을 덮어씁니다 (upsert).

use crate::error::Result;
use crate::storage::postgres::Database;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, instrument};

/// 뉴스 기사 레코드.
///
/// 기업 뉴스는 `ticker`가, 매크로 뉴스는 `theme`이 채워집니다.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsArticleRecord {
    pub id: i64,
    pub ticker: Option<String>,
    pub theme: Option<String>,
    pub headline: String,
    pub content: String,
    pub provider_url: String,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

/// 뉴스 기사 저장 입력.
#[derive(Debug, Clone)]
pub struct NewsArticleInput {
    pub ticker: Option<String>,
    pub theme: Option<String>,
    pub headline: String,
    pub content: String,
    pub provider_url: String,
    pub source: String,
}

/// 뉴스 볼트 repository.
#[derive(Clone)]
pub struct NewsRepository {
    db: Database,
}

impl NewsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 기사 하나를 upsert합니다.
    ///
    /// `provider_url` 충돌 시 제목/내용/수집 시각을 갱신하므로
    /// 같은 기사를 다시 가져오는 것은 멱등합니다.
    #[instrument(skip(self, input), fields(url = %input.provider_url))]
    pub async fn upsert(&self, input: &NewsArticleInput) -> Result<NewsArticleRecord> {
        let record: NewsArticleRecord = sqlx::query_as(
            r#"
            INSERT INTO news_vault (ticker, theme, headline, content, provider_url, source, fetched_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (provider_url) DO UPDATE SET
                ticker = EXCLUDED.ticker,
                theme = EXCLUDED.theme,
                headline = EXCLUDED.headline,
                content = EXCLUDED.content,
                source = EXCLUDED.source,
                fetched_at = NOW()
            RETURNING id, ticker, theme, headline, content, provider_url, source, fetched_at
            "#,
        )
        .bind(&input.ticker)
        .bind(&input.theme)
        .bind(&input.headline)
        .bind(&input.content)
        .bind(&input.provider_url)
        .bind(&input.source)
        .fetch_one(self.db.pool())
        .await?;

        Ok(record)
    }

    /// 여러 기사를 upsert합니다.
    ///
    /// 각 기사는 단일 행 upsert이므로 개별적으로 원자적입니다.
    pub async fn upsert_batch(&self, inputs: &[NewsArticleInput]) -> Result<usize> {
        let mut stored = 0;
        for input in inputs {
            self.upsert(input).await?;
            stored += 1;
        }

        debug!(count = stored, "뉴스 기사 저장 완료");
        Ok(stored)
    }

    /// 티커의 기사를 조회합니다 (최신순).
    ///
    /// `since`가 주어지면 해당 시각 이후 수집된 기사만 반환합니다
    /// (신선도 윈도우).
    #[instrument(skip(self))]
    pub async fn list_for_ticker(
        &self,
        ticker: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<NewsArticleRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, ticker, theme, headline, content, provider_url, source, fetched_at
            FROM news_vault
            WHERE ticker = $1
                AND ($2::timestamptz IS NULL OR fetched_at >= $2)
            ORDER BY fetched_at DESC, id DESC
            "#,
        )
        .bind(ticker)
        .bind(since)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// 테마의 매크로 기사를 조회합니다 (최신순).
    #[instrument(skip(self))]
    pub async fn list_for_theme(&self, theme: &str) -> Result<Vec<NewsArticleRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, ticker, theme, headline, content, provider_url, source, fetched_at
            FROM news_vault
            WHERE theme = $1
            ORDER BY fetched_at DESC, id DESC
            "#,
        )
        .bind(theme)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// URL에 해당하는 행 수를 조회합니다.
    ///
    /// upsert 불변식 검증용 (항상 0 또는 1).
    pub async fn count_for_url(&self, provider_url: &str) -> Result<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM news_vault WHERE provider_url = $1")
                .bind(provider_url)
                .fetch_one(self.db.pool())
                .await?;

        Ok(result.0)
    }
}
