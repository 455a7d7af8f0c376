use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// 버전의 검토 단계. 고정된 진행 순서(ordinal)를 가지며,
/// 같은 플랜에서 이전 단계로 되돌아가는 버전 생성은 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum VersionType {
    #[serde(rename = "SYSTEM_PROPOSED")]
    #[sqlx(rename = "SYSTEM_PROPOSED")]
    SystemProposed,
    #[serde(rename = "USER_ADJUSTED")]
    #[sqlx(rename = "USER_ADJUSTED")]
    UserAdjusted,
    #[serde(rename = "FINANCE_REVIEWED")]
    #[sqlx(rename = "FINANCE_REVIEWED")]
    FinanceReviewed,
    #[serde(rename = "BOD_APPROVED")]
    #[sqlx(rename = "BOD_APPROVED")]
    BodApproved,
    #[serde(rename = "BRAND_CONSENSUS")]
    #[sqlx(rename = "BRAND_CONSENSUS")]
    BrandConsensus,
}

impl VersionType {
    /// 진행 순서상의 위치. 같은 플랜의 새 버전은 마지막 버전보다
    /// ordinal이 작을 수 없습니다 (같은 값은 리비전으로 허용).
    pub fn ordinal(self) -> u8 {
        match self {
            VersionType::SystemProposed => 0,
            VersionType::UserAdjusted => 1,
            VersionType::FinanceReviewed => 2,
            VersionType::BodApproved => 3,
            VersionType::BrandConsensus => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VersionType::SystemProposed => "SYSTEM_PROPOSED",
            VersionType::UserAdjusted => "USER_ADJUSTED",
            VersionType::FinanceReviewed => "FINANCE_REVIEWED",
            VersionType::BodApproved => "BOD_APPROVED",
            VersionType::BrandConsensus => "BRAND_CONSENSUS",
        }
    }
}

/// 버전 상태 머신.
/// DRAFT → SUBMITTED → (UNDER_REVIEW →) APPROVED | REJECTED
/// 같은 플랜에 새 버전이 생성되면 이전 최신 버전은 SUPERSEDED가 됩니다.
/// APPROVED / REJECTED / SUPERSEDED는 종료 상태입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum VersionStatus {
    #[serde(rename = "DRAFT")]
    #[sqlx(rename = "DRAFT")]
    Draft,
    #[serde(rename = "SUBMITTED")]
    #[sqlx(rename = "SUBMITTED")]
    Submitted,
    #[serde(rename = "UNDER_REVIEW")]
    #[sqlx(rename = "UNDER_REVIEW")]
    UnderReview,
    #[serde(rename = "APPROVED")]
    #[sqlx(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    #[sqlx(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "SUPERSEDED")]
    #[sqlx(rename = "SUPERSEDED")]
    Superseded,
}

impl VersionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Draft => "DRAFT",
            VersionStatus::Submitted => "SUBMITTED",
            VersionStatus::UnderReview => "UNDER_REVIEW",
            VersionStatus::Approved => "APPROVED",
            VersionStatus::Rejected => "REJECTED",
            VersionStatus::Superseded => "SUPERSEDED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanVersion {
    pub id: String,
    pub plan_id: String,
    pub version_number: i64,
    pub version_type: VersionType,
    pub status: VersionStatus,
    /// 이 버전 시점의 계획 수치 전체. 불변 blob으로 취급하며 부분 수정하지 않습니다.
    pub snapshot_data: Json<serde_json::Value>,
    pub total_value: f64,
    pub total_units: i64,
    pub created_by: Option<String>,
    pub submitted_by: Option<String>,
    pub approved_by: Option<String>,
    pub approval_comments: Option<String>,
    pub created_at: String,
    pub submitted_at: Option<String>,
    pub approved_at: Option<String>,
}

/// 목록 조회용 요약 (snapshot_data 제외)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanVersionSummary {
    pub id: String,
    pub plan_id: String,
    pub version_number: i64,
    pub version_type: VersionType,
    pub status: VersionStatus,
    pub total_value: f64,
    pub total_units: i64,
    pub created_by: Option<String>,
    pub created_at: String,
    pub submitted_at: Option<String>,
    pub approved_at: Option<String>,
}

/// 타임라인 항목: 버전 요약 + 최근 변경 수(최대 5) + 관련 사용자 이름
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VersionTimelineEntry {
    pub id: String,
    pub version_number: i64,
    pub version_type: VersionType,
    pub status: VersionStatus,
    pub total_value: f64,
    pub total_units: i64,
    pub approval_comments: Option<String>,
    pub created_at: String,
    pub submitted_at: Option<String>,
    pub approved_at: Option<String>,
    pub recent_change_count: i64,
    pub created_by_name: Option<String>,
    pub submitted_by_name: Option<String>,
    pub approved_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub plan_id: String,
    pub version_type: VersionType,
    pub snapshot_data: serde_json::Value,
    pub total_value: f64,
    pub total_units: i64,
    pub comments: Option<String>,
}

/// PATCH용 부분 업데이트. status 필드는 의도적으로 없습니다 —
/// 상태 변경은 submit/review/approve/reject 전용 연산으로만 가능합니다.
#[derive(Debug, Deserialize)]
pub struct VersionPatch {
    pub snapshot_data: Option<serde_json::Value>,
    pub total_value: Option<f64>,
    pub total_units: Option<i64>,
    pub approval_comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitVersionRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveVersionRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectVersionRequest {
    pub reason: String,
}

/// `GET /versions` 필터 + 페이지네이션 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct VersionListQuery {
    pub plan_id: Option<String>,
    pub version_type: Option<VersionType>,
    pub status: Option<VersionStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub v1: String,
    pub v2: String,
}
