//! 기업 뉴스 엔드포인트.
//!
//! - `GET /api/v1/news/{ticker}`: 신선도 윈도우 내 캐시된 기사만 조회
//! - `POST /api/v1/news/{ticker}/fetch`: 캐시 확인 후 필요 시 제공자 호출

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use investor_data::NewsArticleRecord;

use crate::error::{db_unavailable, from_data_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 뉴스 수집 요청.
#[derive(Debug, Deserialize)]
pub struct FetchNewsRequest {
    /// Finnhub API 키
    pub api_key: String,
    /// true면 캐시를 무시하고 강제로 새로 가져옴
    #[serde(default)]
    pub force: bool,
}

/// 뉴스 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsListResponse {
    /// 캐시에서 제공되었는지 여부
    pub was_cached: bool,
    /// 기사 수
    pub count: usize,
    /// 기사 목록 (최신순)
    pub articles: Vec<NewsArticleRecord>,
}

impl NewsListResponse {
    fn new(articles: Vec<NewsArticleRecord>, was_cached: bool) -> Self {
        Self {
            was_cached,
            count: articles.len(),
            articles,
        }
    }
}

/// 캐시된 기업 뉴스 조회.
///
/// GET /api/v1/news/{ticker}
async fn get_cached_news(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<NewsListResponse>> {
    let resolver = state.resolver.as_ref().ok_or_else(db_unavailable)?;

    let articles = resolver
        .cached_company_news(&ticker)
        .await
        .map_err(from_data_error)?;

    Ok(Json(NewsListResponse::new(articles, true)))
}

/// 기업 뉴스 해석 (캐시 우선, 미스 시 수집).
///
/// POST /api/v1/news/{ticker}/fetch
async fn fetch_news(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchNewsRequest>,
) -> ApiResult<Json<NewsListResponse>> {
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
        let articles = resolver
            .refresh_company_news(&ticker, Some(&req.api_key))
            .await
            .map_err(from_data_error)?;
        return Ok(Json(NewsListResponse::new(articles, false)));
    }

    let resolved = resolver
        .resolve_company_news(&ticker, Some(&req.api_key))
        .await
        .map_err(from_data_error)?;

    Ok(Json(NewsListResponse::new(
        resolved.records,
        resolved.was_cached,
    )))
}

/// 기업 뉴스 라우터 생성.
pub fn news_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{ticker}", get(get_cached_news))
        .route("/{ticker}/fetch", post(fetch_news))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_fetch_news_rejects_empty_credential() {
        let state = Arc::new(crate::state::create_test_state());
        let app = Router::new()
            .nest("/api/v1/news", news_router())
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/news/AAPL/fetch")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"api_key":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CREDENTIAL");
    }
}
