//! # 플랜 라우트 핸들러
//!
//! OTB 플랜(버전들의 부모 엔티티)의 최소 CRUD입니다.
//! 버전 API가 참조할 plan_id와, approve가 갱신하는
//! current_version 포인터를 제공하는 것이 주 역할입니다.
//!
//! ## 엔드포인트
//! - `GET  /api/v1/plans`      → 플랜 목록
//! - `POST /api/v1/plans`      → 플랜 생성
//! - `GET  /api/v1/plans/{id}` → 단일 플랜 조회

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::versions::AppState;

pub async fn list_plans(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let plans = db::list_plans(&state.pool).await?;
    Ok(Json(json!({ "plans": plans })))
}

pub async fn get_plan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Plan>, AppError> {
    let plan = db::get_plan(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(plan))
}

pub async fn create_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    auth_user.require_role(&[
        UserRole::Admin,
        UserRole::BrandManager,
        UserRole::BrandPlanner,
    ])?;

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("plan name is required".to_string()));
    }

    let plan = db::create_plan(&state.pool, &req, &auth_user.user_id).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}
