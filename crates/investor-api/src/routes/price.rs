//! 가격 조회/수집 엔드포인트.
//!
//! - `GET /api/v1/price/{ticker}`: 캐시된 최신 가격만 조회 (네트워크 없음)
//! - `POST /api/v1/price/{ticker}/fetch`: 캐시 확인 후 필요 시 제공자 호출

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use investor_data::PriceRecord;

use crate::error::{db_unavailable, from_data_error, ApiErrorResponse, ApiResult};
use crate::routes::clamp_limit;
use crate::state::AppState;

/// 가격 수집 요청.
#[derive(Debug, Deserialize)]
pub struct FetchPriceRequest {
    /// Finnhub API 키 (세션마다 사용자가 입력, 서버에 저장되지 않음)
    pub api_key: String,
    /// true면 캐시를 무시하고 강제로 새로 가져옴
    #[serde(default)]
    pub force: bool,
}

/// 가격 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    /// 캐시에서 제공되었는지 여부
    pub was_cached: bool,
    /// 가격 레코드 (스토어 기준)
    pub record: PriceRecord,
}

/// 캐시된 최신 가격 조회.
///
/// GET /api/v1/price/{ticker}
async fn get_cached_price(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PriceResponse>> {
    let resolver = state.resolver.as_ref().ok_or_else(db_unavailable)?;

    match resolver.cached_price(&ticker).await.map_err(from_data_error)? {
        Some(record) => Ok(Json(PriceResponse {
            was_cached: true,
            record,
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse::new(
                "CACHE_MISS",
                format!("티커 {} 캐시된 가격 없음. fetch를 호출하세요.", ticker),
            )),
        )),
    }
}

/// 가격 해석 (캐시 우선, 미스 시 수집).
///
/// POST /api/v1/price/{ticker}/fetch
async fn fetch_price(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchPriceRequest>,
) -> ApiResult<Json<PriceResponse>> {
    // 사전조건: 자격증명이 없으면 스토어/네트워크 접근 전에 실패
    if req.api_key.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "MISSING_CREDENTIAL",
                "Finnhub API 키가 비어 있습니다",
            )),
        ));
    }

    let resolver = state.resolver.as_ref().ok_or_else(db_unavailable)?;

    if req.force {
        let record = resolver
            .refresh_price(&ticker, Some(&req.api_key))
            .await
            .map_err(from_data_error)?;
        return Ok(Json(PriceResponse {
            was_cached: false,
            record,
        }));
    }

    let resolved = resolver
        .resolve_price(&ticker, Some(&req.api_key))
        .await
        .map_err(from_data_error)?;

    Ok(Json(PriceResponse {
        was_cached: resolved.was_cached,
        record: resolved.records,
    }))
}

/// 가격 이력 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceHistoryResponse {
    pub count: usize,
    pub records: Vec<PriceRecord>,
}

/// 이력 조회 쿼리.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

/// 캐시된 가격 이력 조회 (최신순).
///
/// GET /api/v1/price/{ticker}/history?limit=
async fn get_price_history(
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PriceHistoryResponse>> {
    let prices = state.prices.as_ref().ok_or_else(db_unavailable)?;

    let records = prices
        .list_recent(ticker.trim().to_uppercase().as_str(), clamp_limit(query.limit))
        .await
        .map_err(from_data_error)?;

    Ok(Json(PriceHistoryResponse {
        count: records.len(),
        records,
    }))
}

/// 가격 라우터 생성.
pub fn price_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{ticker}", get(get_cached_price))
        .route("/{ticker}/fetch", post(fetch_price))
        .route("/{ticker}/history", get(get_price_history))
}
