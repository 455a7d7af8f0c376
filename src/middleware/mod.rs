//! # 미들웨어 모듈
//!
//! - `auth`: JWT 기반 인증. `AuthUser` extractor와 토큰 생성/검증 함수

pub mod auth;
