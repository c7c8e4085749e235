//! PostgreSQL 영속 스토어.
//!
//! 네 개의 테이블(price_cache, news_vault, research_notes, api_logs)에
//! 대한 repository 패턴 구현을 제공합니다.

pub mod api_logs;
pub mod news_vault;
pub mod postgres;
pub mod price_cache;
pub mod research_notes;
