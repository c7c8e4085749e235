//! API 사용 로그 저장소.
//!
//! 모든 resolve 연산은 캐시 히트/미스와 무관하게 로그 한 건을 남깁니다.
//! append-only 감사 기록이며 수정/삭제 경로는 없습니다.

use crate::error::Result;
use crate::storage::postgres::Database;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;

/// API 사용 로그 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiLogRecord {
    pub id: i64,
    pub api_name: String,
    pub endpoint: String,
    pub was_cached: bool,
    pub logged_at: DateTime<Utc>,
}

/// API 로그 repository.
#[derive(Clone)]
pub struct ApiLogRepository {
    db: Database,
}

impl ApiLogRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 로그 한 건을 기록합니다.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        api_name: &str,
        endpoint: &str,
        was_cached: bool,
    ) -> Result<ApiLogRecord> {
        let record: ApiLogRecord = sqlx::query_as(
            r#"
            INSERT INTO api_logs (api_name, endpoint, was_cached)
            VALUES ($1, $2, $3)
            RETURNING id, api_name, endpoint, was_cached, logged_at
            "#,
        )
        .bind(api_name)
        .bind(endpoint)
        .bind(was_cached)
        .fetch_one(self.db.pool())
        .await?;

        Ok(record)
    }

    /// 최근 로그를 조회합니다 (최신순).
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ApiLogRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, api_name, endpoint, was_cached, logged_at
            FROM api_logs
            ORDER BY logged_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// 특정 API의 로그 수를 조회합니다.
    pub async fn count_for_api(&self, api_name: &str) -> Result<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM api_logs WHERE api_name = $1")
                .bind(api_name)
                .fetch_one(self.db.pool())
                .await?;

        Ok(result.0)
    }
}
