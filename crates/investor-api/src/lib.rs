//! 투자 대시보드 REST API.
//!
//! 대시보드의 사용자 액션(가격 조회, 뉴스 수집, 매크로 검색, 노트 작성)을
//! REST 엔드포인트로 노출합니다.

pub mod error;
pub mod routes;
pub mod state;
