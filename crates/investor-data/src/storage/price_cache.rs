//! 가격 캐시 저장소.
//!
//! 시세 스냅샷을 append-only로 저장합니다. 동일 티커에 대한 반복 조회는
//! 행을 추가하며(고유 제약 없음), 최신 행 판정은 `fetched_at`에 삽입
//! 순번(`id`)을 더해 결정적으로 이루어집니다.

use crate::error::Result;
use crate::storage::postgres::Database;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, info, instrument};

/// 가격 캐시 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRecord {
    pub id: i64,
    pub ticker: String,
    pub price: Decimal,
    pub volume: i64,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

/// 가격 캐시 repository.
#[derive(Clone)]
pub struct PriceRepository {
    db: Database,
}

impl PriceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 시세 스냅샷을 추가합니다 (append, 중복 허용).
    #[instrument(skip(self))]
    pub async fn insert(
        &self,
        ticker: &str,
        price: Decimal,
        volume: i64,
        source: &str,
    ) -> Result<PriceRecord> {
        let record: PriceRecord = sqlx::query_as(
            r#"
            INSERT INTO price_cache (ticker, price, volume, source)
            VALUES ($1, $2, $3, $4)
            RETURNING id, ticker, price, volume, source, fetched_at
            "#,
        )
        .bind(ticker)
        .bind(price)
        .bind(volume)
        .bind(source)
        .fetch_one(self.db.pool())
        .await?;

        debug!(ticker = ticker, price = %price, id = record.id, "가격 스냅샷 저장");
        Ok(record)
    }

    /// 티커의 최신 가격 행을 조회합니다.
    ///
    /// `fetched_at` 동률 시 `id`가 큰 행(나중 삽입)이 우선합니다.
    #[instrument(skip(self))]
    pub async fn latest(&self, ticker: &str) -> Result<Option<PriceRecord>> {
        let record: Option<PriceRecord> = sqlx::query_as(
            r#"
            SELECT id, ticker, price, volume, source, fetched_at
            FROM price_cache
            WHERE ticker = $1
            ORDER BY fetched_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(ticker)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    /// 티커의 최근 가격 이력을 조회합니다 (최신순).
    pub async fn list_recent(&self, ticker: &str, limit: i64) -> Result<Vec<PriceRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, ticker, price, volume, source, fetched_at
            FROM price_cache
            WHERE ticker = $1
            ORDER BY fetched_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(ticker)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// 티커의 캐시된 행 수를 조회합니다.
    pub async fn count_for_ticker(&self, ticker: &str) -> Result<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM price_cache WHERE ticker = $1")
                .bind(ticker)
                .fetch_one(self.db.pool())
                .await?;

        Ok(result.0)
    }

    /// 오래된 스냅샷 삭제 (데이터 보존 정책).
    ///
    /// append-only 테이블의 무한 증가를 막기 위한 명시적 정리 연산입니다.
    /// 조회 경로에서는 절대 호출되지 않습니다.
    pub async fn cleanup_older_than(&self, retention_days: i64) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(retention_days);

        let result = sqlx::query("DELETE FROM price_cache WHERE fetched_at < $1")
            .bind(cutoff)
            .execute(self.db.pool())
            .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted = deleted, retention_days = retention_days, "오래된 가격 캐시 삭제");
        }

        Ok(deleted)
    }
}
