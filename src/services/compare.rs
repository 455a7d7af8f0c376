//! # 버전 비교 엔진
//!
//! 두 버전의 수치 요약 필드(total_value, total_units)에 대해
//! 절대 변화량과 퍼센트 변화를 계산합니다. 순수 계산만 하며
//! 부수효과가 없습니다 — DB 조회는 호출하는 쪽(routes/)의 몫입니다.

use crate::models::{PlanVersion, VersionStatus, VersionType};
use serde::Serialize;

/// 단일 수치 필드의 변화량
#[derive(Debug, Clone, Serialize)]
pub struct FieldDiff {
    pub from: f64,
    pub to: f64,
    /// to - from
    pub change: f64,
    /// 기준값(from)이 0보다 크면 (change / from) * 100, 아니면 0.
    /// 0으로 나누는 대신 0%로 보고합니다.
    pub change_percent: f64,
}

/// 비교 대상 한쪽의 식별/요약 정보
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSide {
    pub id: String,
    pub plan_id: String,
    pub version_number: i64,
    pub version_type: VersionType,
    pub status: VersionStatus,
    pub total_value: f64,
    pub total_units: i64,
    /// 이 버전에 기록된 변경 이력 총 수 (이력 자체는 포함하지 않음)
    pub change_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonDifferences {
    pub total_value: FieldDiff,
    pub total_units: FieldDiff,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionComparison {
    pub version_a: ComparisonSide,
    pub version_b: ComparisonSide,
    pub differences: ComparisonDifferences,
}

fn diff_field(from: f64, to: f64) -> FieldDiff {
    let change = to - from;
    let change_percent = if from > 0.0 { (change / from) * 100.0 } else { 0.0 };
    FieldDiff { from, to, change, change_percent }
}

fn summarize(version: &PlanVersion, change_count: i64) -> ComparisonSide {
    ComparisonSide {
        id: version.id.clone(),
        plan_id: version.plan_id.clone(),
        version_number: version.version_number,
        version_type: version.version_type,
        status: version.status,
        total_value: version.total_value,
        total_units: version.total_units,
        change_count,
    }
}

/// 두 버전을 비교합니다. 변화량은 항상 `b - a` 방향입니다.
/// version_type과 status는 수치 비교 없이 양쪽 값을 그대로 보고합니다.
pub fn compare_versions(
    a: &PlanVersion,
    b: &PlanVersion,
    a_change_count: i64,
    b_change_count: i64,
) -> VersionComparison {
    VersionComparison {
        version_a: summarize(a, a_change_count),
        version_b: summarize(b, b_change_count),
        differences: ComparisonDifferences {
            total_value: diff_field(a.total_value, b.total_value),
            total_units: diff_field(a.total_units as f64, b.total_units as f64),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn version(number: i64, value: f64, units: i64) -> PlanVersion {
        PlanVersion {
            id: format!("v{}", number),
            plan_id: "p1".to_string(),
            version_number: number,
            version_type: VersionType::SystemProposed,
            status: VersionStatus::Draft,
            snapshot_data: Json(serde_json::json!({})),
            total_value: value,
            total_units: units,
            created_by: None,
            submitted_by: None,
            approved_by: None,
            approval_comments: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            submitted_at: None,
            approved_at: None,
        }
    }

    #[test]
    fn computes_change_and_percent() {
        let a = version(1, 1_000_000.0, 500);
        let b = version(2, 1_200_000.0, 550);

        let result = compare_versions(&a, &b, 3, 7);
        assert_eq!(result.differences.total_value.change, 200_000.0);
        assert_eq!(result.differences.total_value.change_percent, 20.0);
        assert_eq!(result.differences.total_units.change, 50.0);
        assert_eq!(result.differences.total_units.change_percent, 10.0);
        assert_eq!(result.version_a.change_count, 3);
        assert_eq!(result.version_b.change_count, 7);
    }

    #[test]
    fn zero_baseline_reports_zero_percent() {
        let a = version(1, 0.0, 0);
        let b = version(2, 100.0, 10);

        let result = compare_versions(&a, &b, 0, 0);
        assert_eq!(result.differences.total_value.change, 100.0);
        // Infinity/NaN 대신 0%
        assert_eq!(result.differences.total_value.change_percent, 0.0);
        assert_eq!(result.differences.total_units.change_percent, 0.0);
    }

    #[test]
    fn swapping_inputs_negates_change() {
        let a = version(1, 800.0, 40);
        let b = version(2, 1_000.0, 30);

        let forward = compare_versions(&a, &b, 0, 0);
        let backward = compare_versions(&b, &a, 0, 0);
        assert_eq!(
            forward.differences.total_value.change,
            -backward.differences.total_value.change
        );
        assert_eq!(
            forward.differences.total_units.change,
            -backward.differences.total_units.change
        );
    }
}
