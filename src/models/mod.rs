//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `change`: 버전 변경 이력(감사 로그) 관련 구조체
//! - `plan`: OTB 플랜(버전들의 부모 엔티티) 관련 구조체
//! - `user`: 사용자(User)와 역할(Role) 관련 구조체
//! - `version`: 플랜 버전과 상태/단계 열거형, 요청/응답 구조체
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::version::PlanVersion` 대신 `crate::models::PlanVersion`으로 접근 가능

// pub mod: 하위 모듈을 공개(public)로 선언합니다.
// pub이 없으면 이 모듈 내부에서만 접근 가능합니다.
pub mod change;
pub mod plan;
pub mod user;
pub mod version;

// pub use: 하위 모듈의 항목을 현재 모듈에서 재공개합니다.
// `*`(glob)는 모든 공개 항목을 의미합니다.
// 이렇게 하면 사용하는 쪽에서 `models::PlanVersion`처럼 짧게 쓸 수 있습니다.
pub use change::*;
pub use plan::*;
pub use user::*;
pub use version::*;
