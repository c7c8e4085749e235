//! 투자 대시보드 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 가격 조회, 기업/매크로 뉴스 수집, 리서치 노트, API 로그 엔드포인트를
//! 제공합니다. 영속 스토어에 연결할 수 없으면 경고를 남기고 degraded
//! 상태로 계속 기동합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use investor_api::routes::create_api_router;
use investor_api::state::AppState;
use investor_core::{init_logging, AppConfig, LogConfig};
use investor_data::{Database, DatabaseConfig};

/// 스토어 연결 시도.
///
/// `DATABASE_URL`이 없거나 연결에 실패하면 None을 반환하고,
/// 서버는 degraded 상태로 기동합니다.
async fn connect_store(config: &AppConfig) -> Option<Database> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            warn!("DATABASE_URL not set, starting in degraded mode (no persistent store)");
            return None;
        }
    };

    let db_config = DatabaseConfig::new(url, &config.database);
    match Database::connect(&db_config).await {
        Ok(db) => {
            // 스키마 준비 (idempotent)
            if let Err(e) = db.migrate().await {
                error!(error = %e, "Migration failed");
                return None;
            }
            info!("Persistent store connected");
            Some(db)
        }
        Err(e) => {
            warn!(error = %e, "Store unreachable, starting in degraded mode");
            None
        }
    }
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (config/default.toml + INVESTOR__ 환경변수)
    let config = AppConfig::load_or_default()
        .map_err(|e| anyhow::anyhow!("설정 로드 실패: {}", e))?;

    // tracing 초기화
    let log_format = config.logging.format.parse().unwrap_or_default();
    let log_config = LogConfig::new(&config.logging.level).with_format(log_format);
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting Mission Control API server...");

    // 스토어 연결 (실패해도 계속 진행)
    let db = connect_store(&config).await;

    // AppState 빌드 - 스토어 핸들은 여기서 한 번 주입되고 전 구간에서 재사용
    let mut state = AppState::new(config.providers.clone());
    if let Some(db) = db {
        state = state.with_database(db);
    }
    let state = Arc::new(state);

    info!(
        version = %state.version,
        has_db = state.has_database(),
        "Application state initialized"
    );

    // 가격 캐시 보존 정책 적용 (기동 시 1회)
    if let Some(resolver) = &state.resolver {
        match resolver
            .cleanup_price_cache(config.providers.price_retention_days)
            .await
        {
            Ok(deleted) if deleted > 0 => {
                info!(deleted = deleted, "Price cache retention applied");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Price cache cleanup failed"),
        }
    }

    // 라우터 생성
    let app = create_router(state);

    // 서버 시작
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                "소켓 주소 설정이 유효하지 않습니다"
            );
            anyhow::anyhow!("잘못된 소켓 주소: {}", e)
        })?;

    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 서버를 정리하고 종료합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
