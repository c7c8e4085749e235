//! 매크로 뉴스 검색 엔드포인트.
//!
//! - `GET /api/v1/macro?theme=`: 테마의 캐시된 기사만 조회
//! - `POST /api/v1/macro/search`: 캐시 확인 후 필요 시 제공자 검색
//!
//! 매크로 뉴스에는 신선도 윈도우가 없습니다. 저장된 기사가 있으면 항상
//! 히트이며, 갱신은 `force` 검색으로만 일어납니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{db_unavailable, from_data_error, ApiErrorResponse, ApiResult};
use crate::routes::news::NewsListResponse;
use crate::state::AppState;

/// 캐시 조회 쿼리.
#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    /// 자유 검색어 (예: "Inflation")
    pub theme: String,
}

/// 매크로 검색 요청.
#[derive(Debug, Deserialize)]
pub struct MacroSearchRequest {
    /// 자유 검색어
    pub theme: String,
    /// TheNewsAPI 키
    pub api_key: String,
    /// true면 캐시를 무시하고 다시 검색
    #[serde(default)]
    pub force: bool,
}

/// 캐시된 매크로 뉴스 조회.
///
/// GET /api/v1/macro?theme=Inflation
async fn get_cached_macro(
    Query(query): Query<ThemeQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<NewsListResponse>> {
    let resolver = state.resolver.as_ref().ok_or_else(db_unavailable)?;

    let articles = resolver
        .cached_macro_news(&query.theme)
        .await
        .map_err(from_data_error)?;

    let count = articles.len();
    Ok(Json(NewsListResponse {
        was_cached: true,
        count,
        articles,
    }))
}

/// 매크로 뉴스 해석 (캐시 우선, 미스 시 검색).
///
/// POST /api/v1/macro/search
async fn search_macro(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MacroSearchRequest>,
) -> ApiResult<Json<NewsListResponse>> {
    if req.api_key.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "MISSING_CREDENTIAL",
                "TheNewsAPI 키가 비어 있습니다",
            )),
        ));
    }

    let resolver = state.resolver.as_ref().ok_or_else(db_unavailable)?;

    if req.force {
        let articles = resolver
            .refresh_macro_news(&req.theme, Some(&req.api_key))
            .await
            .map_err(from_data_error)?;
        let count = articles.len();
        return Ok(Json(NewsListResponse {
            was_cached: false,
            count,
            articles,
        }));
    }

    let resolved = resolver
        .resolve_macro_news(&req.theme, Some(&req.api_key))
        .await
        .map_err(from_data_error)?;

    let count = resolved.records.len();
    Ok(Json(NewsListResponse {
        was_cached: resolved.was_cached,
        count,
        articles: resolved.records,
    }))
}

/// 매크로 뉴스 라우터 생성.
pub fn macro_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_cached_macro))
        .route("/search", post(search_macro))
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
    async fn test_search_rejects_empty_credential() {
        let state = Arc::new(crate::state::create_test_state());
        let app = Router::new()
            .nest("/api/v1/macro", macro_router())
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/macro/search")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"theme":"Inflation","api_key":""}"#))
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
