//! 리서치 노트 저장소.
//!
//! 사용자가 직접 제출한 지식 은행 항목을 저장합니다.
//! 생성만 가능하며 수정/삭제 경로는 없습니다.

use crate::error::Result;
use crate::storage::postgres::Database;
use chrono::{DateTime, Utc};
use investor_core::NoteTopic;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, instrument};
use uuid::Uuid;

/// 리서치 노트 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResearchNoteRecord {
    pub id: Uuid,
    pub ticker: String,
    pub topic: String,
    pub content: String,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 리서치 노트 생성 입력.
///
/// 검증(필수 필드, 주제 enum)은 intake 계층에서 끝난 상태로 전달됩니다.
#[derive(Debug, Clone)]
pub struct ResearchNoteInput {
    pub ticker: String,
    pub topic: NoteTopic,
    pub content: String,
    pub source_url: Option<String>,
}

/// 리서치 노트 repository.
#[derive(Clone)]
pub struct ResearchNoteRepository {
    db: Database,
}

impl ResearchNoteRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 노트를 추가합니다.
    #[instrument(skip(self, input), fields(ticker = %input.ticker, topic = %input.topic))]
    pub async fn insert(&self, input: &ResearchNoteInput) -> Result<ResearchNoteRecord> {
        let record: ResearchNoteRecord = sqlx::query_as(
            r#"
            INSERT INTO research_notes (ticker, topic, content, source_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, ticker, topic, content, source_url, created_at
            "#,
        )
        .bind(&input.ticker)
        .bind(input.topic.as_str())
        .bind(&input.content)
        .bind(&input.source_url)
        .fetch_one(self.db.pool())
        .await?;

        debug!(id = %record.id, "리서치 노트 저장");
        Ok(record)
    }

    /// 최근 노트를 조회합니다 (최신순).
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ResearchNoteRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, ticker, topic, content, source_url, created_at
            FROM research_notes
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// 특정 티커의 노트를 조회합니다 (최신순).
    pub async fn list_for_ticker(&self, ticker: &str, limit: i64) -> Result<Vec<ResearchNoteRecord>> {
        sqlx::query_as(
            r#"
            SELECT id, ticker, topic, content, source_url, created_at
            FROM research_notes
            WHERE ticker = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(ticker)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }
}
