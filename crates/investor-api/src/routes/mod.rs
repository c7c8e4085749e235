//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/price` - 가격 조회/수집
//! - `/api/v1/news` - 기업 뉴스 조회/수집
//! - `/api/v1/macro` - 매크로 뉴스 검색
//! - `/api/v1/notes` - 리서치 노트
//! - `/api/v1/logs` - API 사용 로그

pub mod health;
pub mod logs;
pub mod macro_news;
pub mod news;
pub mod notes;
pub mod price;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use logs::{logs_router, LogsResponse};
pub use macro_news::{macro_router, MacroSearchRequest};
pub use news::{news_router, NewsListResponse};
pub use notes::{notes_router, CreateNoteRequest, NoteCreatedResponse};
pub use price::{price_router, FetchPriceRequest, PriceResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 목록 조회 limit 기본값.
const DEFAULT_LIST_LIMIT: i64 = 50;
/// 목록 조회 limit 상한.
const MAX_LIST_LIMIT: i64 = 200;

/// 쿼리 파라미터 limit을 유효 범위로 보정합니다.
pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/price", price_router())
        .nest("/api/v1/news", news_router())
        .nest("/api/v1/macro", macro_router())
        .nest("/api/v1/notes", notes_router())
        .nest("/api/v1/logs", logs_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
    }
}
