//! # 플랜 버전 라우트 핸들러
//!
//! 버전 라이프사이클(생성 → 제출 → 검토 → 승인/반려)과
//! 변경 이력, 타임라인, 버전 비교를 처리하는 HTTP 핸들러들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/versions`                    → 버전 목록 (필터 + 페이지네이션)
//! - `POST   /api/v1/versions`                    → 새 버전 생성 (DRAFT)
//! - `GET    /api/v1/versions/{id}`               → 단일 버전 조회
//! - `PATCH  /api/v1/versions/{id}`               → 버전 수정 (status 제외 부분 업데이트)
//! - `POST   /api/v1/versions/{id}/submit`        → 제출 (DRAFT → SUBMITTED)
//! - `POST   /api/v1/versions/{id}/review`        → 검토 시작 (SUBMITTED → UNDER_REVIEW)
//! - `POST   /api/v1/versions/{id}/approve`       → 승인 (+ 플랜 포인터 갱신, 원자적)
//! - `POST   /api/v1/versions/{id}/reject`        → 반려 (사유 필수)
//! - `GET    /api/v1/versions/{id}/changes`       → 변경 이력 (최신순)
//! - `POST   /api/v1/versions/{id}/changes`       → 변경 이력 기록
//! - `GET    /api/v1/versions/timeline/{plan_id}` → 플랜 타임라인
//! - `GET    /api/v1/versions/compare?v1=&v2=`    → 두 버전 비교
//!
//! 역할 게이트는 여기(핸들러)에서만 검사합니다.
//! db 계층은 이미 인증/인가된 행위자 ID만 전달받습니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc로 공유되므로 clone해도 풀이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
}

/// 버전 생성/수정이 허용되는 역할
const PLANNING_ROLES: &[UserRole] = &[
    UserRole::Admin,
    UserRole::BrandManager,
    UserRole::BrandPlanner,
];

/// 검토 시작이 허용되는 역할
const REVIEW_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::FinanceHead];

/// 승인/반려가 허용되는 역할
const APPROVAL_ROLES: &[UserRole] = &[
    UserRole::Admin,
    UserRole::FinanceHead,
    UserRole::BodMember,
];

/// `POST /versions` — 새 버전을 DRAFT로 생성합니다.
///
/// 플랜의 최신 버전이 있으면 SUPERSEDED로 전환되고,
/// 단계(version_type)가 역행하면 invalid_transition으로 거부됩니다.
pub async fn create_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<PlanVersion>), AppError> {
    auth_user.require_role(PLANNING_ROLES)?;

    if req.total_value < 0.0 || req.total_units < 0 {
        return Err(AppError::BadRequest(
            "total_value and total_units must be non-negative".to_string(),
        ));
    }

    let version = db::create_version(&state.pool, &req, &auth_user.user_id).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// `GET /versions` — 필터와 페이지네이션으로 버전 목록을 조회합니다.
///
/// 응답: `{ "data": [...], "meta": { "total", "page", "limit", "total_pages" } }`
pub async fn list_versions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<VersionListQuery>,
) -> Result<Json<Value>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (data, total) = db::list_versions(&state.pool, &query).await?;
    // 올림 나눗셈: 마지막 페이지가 꽉 차지 않아도 페이지로 칩니다.
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(json!({
        "data": data,
        "meta": {
            "total": total,
            "page": page,
            "limit": limit,
            "total_pages": total_pages
        }
    })))
}

pub async fn get_version(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PlanVersion>, AppError> {
    let version = db::get_version(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(version))
}

/// `PATCH /versions/{id}` — 부분 업데이트.
/// APPROVED 버전은 불변(403)이며, status는 이 경로로 바꿀 수 없습니다.
pub async fn update_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<VersionPatch>,
) -> Result<Json<PlanVersion>, AppError> {
    auth_user.require_role(PLANNING_ROLES)?;

    let version = db::update_version(&state.pool, &id, &patch)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(version))
}

pub async fn submit_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SubmitVersionRequest>,
) -> Result<Json<PlanVersion>, AppError> {
    let version =
        db::submit_version(&state.pool, &id, &auth_user.user_id, req.comments.as_deref()).await?;
    Ok(Json(version))
}

pub async fn review_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PlanVersion>, AppError> {
    auth_user.require_role(REVIEW_ROLES)?;

    let version = db::review_version(&state.pool, &id).await?;
    Ok(Json(version))
}

pub async fn approve_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ApproveVersionRequest>,
) -> Result<Json<PlanVersion>, AppError> {
    auth_user.require_role(APPROVAL_ROLES)?;

    let version =
        db::approve_version(&state.pool, &id, &auth_user.user_id, req.comments.as_deref()).await?;
    Ok(Json(version))
}

/// `POST /versions/{id}/reject` — approve와 달리 사유(reason)가 필수입니다.
pub async fn reject_version(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RejectVersionRequest>,
) -> Result<Json<PlanVersion>, AppError> {
    auth_user.require_role(APPROVAL_ROLES)?;

    if req.reason.trim().is_empty() {
        return Err(AppError::BadRequest("a rejection reason is required".to_string()));
    }

    let version = db::reject_version(&state.pool, &id, &req.reason).await?;
    Ok(Json(version))
}

pub async fn get_version_changes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 버전 존재 확인
    db::get_version(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes = db::list_changes(&state.pool, &id).await?;
    Ok(Json(json!({ "changes": changes })))
}

pub async fn record_version_change(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RecordChangeRequest>,
) -> Result<(StatusCode, Json<VersionChange>), AppError> {
    // 버전 존재 확인. 상태는 확인하지 않습니다 —
    // 감사 로그이므로 APPROVED 이후의 정정 기록도 허용됩니다.
    db::get_version(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let change = db::record_change(&state.pool, &id, &req).await?;
    Ok((StatusCode::CREATED, Json(change)))
}

/// `GET /versions/timeline/{plan_id}` — 플랜의 버전 타임라인 (번호 오름차순).
pub async fn get_version_timeline(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(plan_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_plan(&state.pool, &plan_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let timeline = db::get_version_timeline(&state.pool, &plan_id).await?;
    Ok(Json(json!({ "plan_id": plan_id, "timeline": timeline })))
}

/// `GET /versions/compare?v1=&v2=` — 두 버전의 수치 비교.
/// 읽기 + 계산만 하며 부수효과가 없습니다.
pub async fn compare_versions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<CompareQuery>,
) -> Result<Json<services::VersionComparison>, AppError> {
    let version_a = db::get_version(&state.pool, &query.v1)
        .await?
        .ok_or(AppError::NotFound)?;
    let version_b = db::get_version(&state.pool, &query.v2)
        .await?
        .ok_or(AppError::NotFound)?;

    let a_changes = db::count_changes(&state.pool, &version_a.id).await?;
    let b_changes = db::count_changes(&state.pool, &version_b.id).await?;

    let comparison = services::compare_versions(&version_a, &version_b, a_changes, b_changes);
    Ok(Json(comparison))
}
