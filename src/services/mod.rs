//! # 비즈니스 로직(서비스) 모듈
//!
//! DB 접근과 HTTP 처리 어디에도 속하지 않는 순수 계산 로직을 담습니다.
//! - `compare`: 두 버전의 수치 비교(변화량/퍼센트) 엔진

pub mod compare;

pub use compare::*;
