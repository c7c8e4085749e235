//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! 스토어 연결 풀은 프로세스 시작 시 한 번 생성되어 여기로 주입되고,
//! 이후 모든 연산이 같은 핸들을 재사용합니다.

use std::sync::Arc;

use investor_core::ProviderConfig;
use investor_data::{
    ApiLogRepository, Database, PriceRepository, ResearchNoteRepository, ResourceResolver,
};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
/// 스토어 연결에 실패해도 서버는 degraded 상태로 기동하므로
/// 스토어 의존 필드는 모두 Option입니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 래퍼 (PostgreSQL)
    pub db: Option<Database>,

    /// 캐시-조회-저장 시퀀스 리졸버
    pub resolver: Option<Arc<ResourceResolver>>,

    /// 가격 캐시 저장소 (이력 조회용 읽기 경로)
    pub prices: Option<PriceRepository>,

    /// 리서치 노트 저장소
    pub notes: Option<ResearchNoteRepository>,

    /// API 사용 로그 저장소
    pub api_logs: Option<ApiLogRepository>,

    /// 외부 제공자 설정
    pub providers: ProviderConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성 (스토어 미연결 상태).
    pub fn new(providers: ProviderConfig) -> Self {
        Self {
            db: None,
            resolver: None,
            prices: None,
            notes: None,
            api_logs: None,
            providers,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    ///
    /// 연결이 설정되면 리졸버와 저장소들도 같은 풀을 공유하도록 생성됩니다.
    pub fn with_database(mut self, db: Database) -> Self {
        self.resolver = Some(Arc::new(ResourceResolver::new(
            db.clone(),
            &self.providers,
        )));
        self.prices = Some(PriceRepository::new(db.clone()));
        self.notes = Some(ResearchNoteRepository::new(db.clone()));
        self.api_logs = Some(ApiLogRepository::new(db.clone()));
        self.db = Some(db);
        self
    }

    /// 스토어 연결 여부 확인.
    pub fn has_database(&self) -> bool {
        self.db.is_some()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(db) = &self.db {
            db.health_check().await.is_ok()
        } else {
            false
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 degraded 상태의 핸들러 동작을 검증할 때 사용합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    AppState::new(ProviderConfig::default())
}
