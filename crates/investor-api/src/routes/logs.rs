//! API 사용 로그 엔드포인트.
//!
//! - `GET /api/v1/logs?limit=`: 최근 API 사용 기록 조회
//!
//! 대시보드의 "API 호출 모니터링" 패널이 사용하는 읽기 전용 뷰입니다.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use investor_data::ApiLogRecord;

use crate::error::{db_unavailable, from_data_error, ApiResult};
use crate::routes::clamp_limit;
use crate::state::AppState;

/// 로그 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub count: usize,
    pub entries: Vec<ApiLogRecord>,
}

/// 목록 조회 쿼리.
#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

/// 최근 API 사용 로그 조회.
///
/// GET /api/v1/logs?limit=
async fn list_logs(
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LogsResponse>> {
    let logs = state.api_logs.as_ref().ok_or_else(db_unavailable)?;

    let entries = logs
        .list_recent(clamp_limit(query.limit))
        .await
        .map_err(from_data_error)?;

    Ok(Json(LogsResponse {
        count: entries.len(),
        entries,
    }))
}

/// 로그 라우터 생성.
pub fn logs_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_logs))
}
