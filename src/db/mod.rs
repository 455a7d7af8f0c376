//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `changes`: 버전 변경 이력(append-only 감사 로그) 쿼리
//! - `plans`: OTB 플랜 CRUD 쿼리
//! - `users`: 사용자 인증 관련 쿼리
//! - `versions`: 버전 저장소와 라이프사이클(생성/제출/검토/승인/반려) 쿼리

pub mod changes;
pub mod plans;
pub mod users;
pub mod versions;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::create_version`처럼 바로 접근할 수 있게 합니다.
pub use changes::*;
pub use plans::*;
pub use versions::*;
