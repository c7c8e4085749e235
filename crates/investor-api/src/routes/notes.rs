//! 리서치 노트 엔드포인트.
//!
//! - `POST /api/v1/notes`: 노트 생성 (검증 실패 시 저장 시도 없음)
//! - `GET /api/v1/notes?limit=`: 최근 노트 조회
//!
//! 생성 성공 후에는 최근 노트 목록을 스토어에서 다시 읽어 함께 반환하므로
//! 호출자는 방금 쓴 노트가 반영된 목록을 바로 렌더링할 수 있습니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use investor_core::NoteTopic;
use investor_data::{ResearchNoteInput, ResearchNoteRecord};

use crate::error::{db_unavailable, from_data_error, ApiErrorResponse, ApiResult};
use crate::routes::clamp_limit;
use crate::state::AppState;

/// 노트 생성 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// 대상 티커 (필수)
    #[validate(length(min = 1, message = "ticker는 비워둘 수 없습니다"))]
    pub ticker: String,
    /// 주제 (고정 집합 중 하나)
    pub topic: String,
    /// 노트 본문 (필수)
    #[validate(length(min = 1, message = "content는 비워둘 수 없습니다"))]
    pub content: String,
    /// 출처 URL (선택, 입력된 경우 형식 검증)
    #[serde(default)]
    #[validate(url(message = "source_url 형식이 잘못되었습니다"))]
    pub source_url: Option<String>,
}

impl CreateNoteRequest {
    /// 공백 정리. 빈 문자열 source_url은 미입력으로 간주합니다.
    fn normalized(mut self) -> Self {
        self.ticker = self.ticker.trim().to_uppercase();
        self.content = self.content.trim().to_string();
        self.source_url = self
            .source_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }
}

/// 노트 생성 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteCreatedResponse {
    /// 방금 생성된 노트
    pub created: ResearchNoteRecord,
    /// 생성 반영 후 최근 노트 목록 (스토어 재조회 결과)
    pub recent: Vec<ResearchNoteRecord>,
}

/// 노트 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotesListResponse {
    pub count: usize,
    pub notes: Vec<ResearchNoteRecord>,
}

/// 목록 조회 쿼리.
#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
    ticker: Option<String>,
}

fn validation_error(message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

/// 노트 생성.
///
/// POST /api/v1/notes
async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<NoteCreatedResponse>)> {
    let req = req.normalized();

    // 입력 검증 - 실패 시 스토어 접근 없음
    if let Err(errors) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::with_details(
                "VALIDATION_ERROR",
                "입력 검증 실패",
                serde_json::to_value(&errors).unwrap_or_default(),
            )),
        ));
    }

    // 주제는 고정 집합만 허용
    let topic: NoteTopic = req
        .topic
        .parse()
        .map_err(|e: String| validation_error(e))?;

    let notes = state.notes.as_ref().ok_or_else(db_unavailable)?;

    let input = ResearchNoteInput {
        ticker: req.ticker,
        topic,
        content: req.content,
        source_url: req.source_url,
    };

    let created = notes.insert(&input).await.map_err(from_data_error)?;

    // read-your-write: 생성 반영 후 목록 재조회
    let recent = notes.list_recent(20).await.map_err(from_data_error)?;

    Ok((
        StatusCode::CREATED,
        Json(NoteCreatedResponse { created, recent }),
    ))
}

/// 최근 노트 조회.
///
/// GET /api/v1/notes?limit=&ticker=
async fn list_notes(
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<NotesListResponse>> {
    let notes = state.notes.as_ref().ok_or_else(db_unavailable)?;
    let limit = clamp_limit(query.limit);

    let records = match &query.ticker {
        Some(ticker) => notes
            .list_for_ticker(ticker.trim(), limit)
            .await
            .map_err(from_data_error)?,
        None => notes.list_recent(limit).await.map_err(from_data_error)?,
    };

    Ok(Json(NotesListResponse {
        count: records.len(),
        notes: records,
    }))
}

/// 노트 라우터 생성.
pub fn notes_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_notes).post(create_note))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = Arc::new(crate::state::create_test_state());
        Router::new()
            .nest("/api/v1/notes", notes_router())
            .with_state(state)
    }

    async fn post_note(body: &str) -> (StatusCode, ApiErrorResponse) {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/notes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        (status, error)
    }

    #[tokio::test]
    async fn test_empty_content_rejected_before_store() {
        // 스토어 미연결 상태: 검증이 먼저 실패해야 DB_UNAVAILABLE이 아닌
        // VALIDATION_ERROR가 반환됨 (스토어 접근 자체가 없다는 증거)
        let (status, error) = post_note(
            r#"{"ticker":"AAPL","topic":"Competitors","content":"   "}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let (status, error) =
            post_note(r#"{"ticker":"","topic":"Competitors","content":"메모"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_topic_rejected() {
        let (status, error) =
            post_note(r#"{"ticker":"AAPL","topic":"Valuation","content":"메모"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("Valuation"));
    }

    #[tokio::test]
    async fn test_malformed_source_url_rejected() {
        let (status, error) = post_note(
            r#"{"ticker":"AAPL","topic":"Competitors","content":"메모","source_url":"not a url"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_valid_note_without_db_is_service_unavailable() {
        // 검증을 통과한 뒤에야 스토어 부재가 드러남
        let (status, error) = post_note(
            r#"{"ticker":"AAPL","topic":"10-K Summary","content":"매출 성장 둔화","source_url":"https://example.com/10k"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.code, "DB_UNAVAILABLE");
    }
}
