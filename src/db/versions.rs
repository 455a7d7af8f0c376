//! # 플랜 버전 저장소 및 라이프사이클 쿼리
//!
//! `plan_versions` 테이블에 대한 버전 생성/조회와
//! 상태 전이(submit → review → approve/reject) 쿼리들을 정의합니다.
//!
//! 상태 전이의 사전 조건 검사는 모두 쓰기 전에 수행되며,
//! 두 개 이상의 행을 건드리는 쓰기(버전 생성의 supersede+insert,
//! 승인의 버전+플랜 포인터)는 하나의 트랜잭션으로 묶입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::SqlitePool;

pub async fn get_version(pool: &SqlitePool, id: &str) -> Result<Option<PlanVersion>, AppError> {
    let version = sqlx::query_as::<_, PlanVersion>(
        r#"
        SELECT id, plan_id, version_number, version_type, status, snapshot_data,
               total_value, total_units, created_by, submitted_by, approved_by,
               approval_comments, created_at, submitted_at, approved_at
        FROM plan_versions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

/// 새 버전을 생성합니다.
///
/// 하나의 트랜잭션 안에서:
/// 1. 플랜의 최신 버전을 조회하고 다음 버전 번호를 계산합니다 (없으면 1).
/// 2. 새 버전의 version_type이 최신 버전보다 이전 단계면 거부합니다 (같은 단계는 리비전).
/// 3. 최신 버전이 있으면 상태와 무관하게 SUPERSEDED로 전환합니다 (APPROVED 포함).
/// 4. 새 버전을 DRAFT 상태로 삽입합니다.
///
/// UNIQUE(plan_id, version_number) 제약이 있어 동시 생성이 경합하면
/// 중복 번호 대신 데이터베이스 에러로 실패합니다.
pub async fn create_version(
    pool: &SqlitePool,
    req: &CreateVersionRequest,
    created_by: &str,
) -> Result<PlanVersion, AppError> {
    let mut tx = pool.begin().await?;

    let plan_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM plans WHERE id = ?")
        .bind(&req.plan_id)
        .fetch_optional(&mut *tx)
        .await?;
    if plan_exists.is_none() {
        return Err(AppError::NotFound);
    }

    let latest = sqlx::query_as::<_, PlanVersionSummary>(
        r#"
        SELECT id, plan_id, version_number, version_type, status, total_value,
               total_units, created_by, created_at, submitted_at, approved_at
        FROM plan_versions
        WHERE plan_id = ?
        ORDER BY version_number DESC
        LIMIT 1
        "#,
    )
    .bind(&req.plan_id)
    .fetch_optional(&mut *tx)
    .await?;

    let next_number = latest.as_ref().map(|v| v.version_number + 1).unwrap_or(1);

    if let Some(latest) = &latest {
        // 단계 역행 금지: 뒤 단계의 버전이 이미 있으면 앞 단계 버전은 만들 수 없습니다.
        if req.version_type.ordinal() < latest.version_type.ordinal() {
            return Err(AppError::InvalidTransition(format!(
                "cannot create a {} version after a {} version",
                req.version_type.as_str(),
                latest.version_type.as_str()
            )));
        }

        // 이전 최신 버전은 어떤 상태였든 SUPERSEDED가 됩니다.
        sqlx::query("UPDATE plan_versions SET status = ? WHERE id = ?")
            .bind(VersionStatus::Superseded)
            .bind(&latest.id)
            .execute(&mut *tx)
            .await?;
    }

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO plan_versions
            (id, plan_id, version_number, version_type, status, snapshot_data,
             total_value, total_units, created_by, approval_comments)
        VALUES (?, ?, ?, ?, 'DRAFT', ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.plan_id)
    .bind(next_number)
    .bind(req.version_type)
    .bind(Json(&req.snapshot_data))
    .bind(req.total_value)
    .bind(req.total_units)
    .bind(created_by)
    .bind(&req.comments)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_version(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created version".to_string()))
}

/// 버전을 수정합니다 (부분 업데이트).
///
/// APPROVED 버전은 불변이므로 수정할 수 없습니다.
/// status는 `VersionPatch`에 아예 없으므로 이 경로로는 바뀌지 않습니다 —
/// 상태 변경은 submit/review/approve/reject 전용 함수로만 가능합니다.
///
/// 각 필드를 개별 UPDATE 문으로 처리합니다.
/// (성능보다 코드 단순성을 우선한 접근)
pub async fn update_version(
    pool: &SqlitePool,
    id: &str,
    patch: &VersionPatch,
) -> Result<Option<PlanVersion>, AppError> {
    let version = match get_version(pool, id).await? {
        Some(v) => v,
        None => return Ok(None),
    };

    if version.status == VersionStatus::Approved {
        return Err(AppError::Forbidden("approved versions are immutable".to_string()));
    }

    if let Some(snapshot) = &patch.snapshot_data {
        sqlx::query("UPDATE plan_versions SET snapshot_data = ? WHERE id = ?")
            .bind(Json(snapshot))
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(total_value) = patch.total_value {
        sqlx::query("UPDATE plan_versions SET total_value = ? WHERE id = ?")
            .bind(total_value)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(total_units) = patch.total_units {
        sqlx::query("UPDATE plan_versions SET total_units = ? WHERE id = ?")
            .bind(total_units)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(comments) = &patch.approval_comments {
        sqlx::query("UPDATE plan_versions SET approval_comments = ? WHERE id = ?")
            .bind(comments)
            .bind(id)
            .execute(pool)
            .await?;
    }

    get_version(pool, id).await
}

/// DRAFT 버전을 제출합니다.
pub async fn submit_version(
    pool: &SqlitePool,
    id: &str,
    actor_id: &str,
    comments: Option<&str>,
) -> Result<PlanVersion, AppError> {
    let version = get_version(pool, id).await?.ok_or(AppError::NotFound)?;

    if version.status != VersionStatus::Draft {
        return Err(AppError::InvalidTransition(format!(
            "only draft versions can be submitted (current status: {})",
            version.status.as_str()
        )));
    }

    sqlx::query(
        r#"
        UPDATE plan_versions
        SET status = 'SUBMITTED',
            submitted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
            submitted_by = ?,
            approval_comments = ?
        WHERE id = ?
        "#,
    )
    .bind(actor_id)
    .bind(comments)
    .bind(id)
    .execute(pool)
    .await?;

    get_version(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve submitted version".to_string()))
}

/// 제출된 버전을 검토 중 상태로 전환합니다. review는 선택 단계입니다 —
/// approve는 SUBMITTED에서 바로도 가능합니다.
pub async fn review_version(pool: &SqlitePool, id: &str) -> Result<PlanVersion, AppError> {
    let version = get_version(pool, id).await?.ok_or(AppError::NotFound)?;

    if version.status != VersionStatus::Submitted {
        return Err(AppError::InvalidTransition(format!(
            "only submitted versions can move to review (current status: {})",
            version.status.as_str()
        )));
    }

    sqlx::query("UPDATE plan_versions SET status = 'UNDER_REVIEW' WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    get_version(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve reviewed version".to_string()))
}

/// 버전을 승인합니다.
///
/// 버전의 상태 변경과 부모 플랜의 current_version 포인터 갱신은
/// 하나의 트랜잭션입니다: 플랜 포인터로 "승인된 버전"을 찾는 독자는
/// 항상 실제로 APPROVED 상태인 버전을 보게 됩니다.
pub async fn approve_version(
    pool: &SqlitePool,
    id: &str,
    actor_id: &str,
    comments: Option<&str>,
) -> Result<PlanVersion, AppError> {
    let version = get_version(pool, id).await?.ok_or(AppError::NotFound)?;

    match version.status {
        VersionStatus::Submitted | VersionStatus::UnderReview => {}
        other => {
            return Err(AppError::InvalidTransition(format!(
                "only submitted or under-review versions can be approved (current status: {})",
                other.as_str()
            )));
        }
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE plan_versions
        SET status = 'APPROVED',
            approved_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
            approved_by = ?,
            approval_comments = ?
        WHERE id = ?
        "#,
    )
    .bind(actor_id)
    .bind(comments)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE plans
        SET current_version = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(version.version_number)
    .bind(&version.plan_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_version(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve approved version".to_string()))
}

/// 버전을 반려합니다. 사유(reason)는 필수이며 approval_comments에 기록됩니다.
pub async fn reject_version(
    pool: &SqlitePool,
    id: &str,
    reason: &str,
) -> Result<PlanVersion, AppError> {
    let version = get_version(pool, id).await?.ok_or(AppError::NotFound)?;

    match version.status {
        VersionStatus::Submitted | VersionStatus::UnderReview => {}
        other => {
            return Err(AppError::InvalidTransition(format!(
                "only submitted or under-review versions can be rejected (current status: {})",
                other.as_str()
            )));
        }
    }

    sqlx::query("UPDATE plan_versions SET status = 'REJECTED', approval_comments = ? WHERE id = ?")
        .bind(reason)
        .bind(id)
        .execute(pool)
        .await?;

    get_version(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve rejected version".to_string()))
}

/// 필터(plan_id, version_type, status)와 페이지네이션으로 버전 목록을 조회합니다.
///
/// PATCH 문서 수정과 같은 방식의 동적 쿼리 구성입니다:
/// 주어진 필터만 WHERE 절에 포함하고, 값은 전부 ?로 바인딩합니다.
pub async fn list_versions(
    pool: &SqlitePool,
    query: &VersionListQuery,
) -> Result<(Vec<PlanVersionSummary>, i64), AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let mut where_clause = String::from(" WHERE 1=1");
    let mut bindings: Vec<String> = Vec::new();

    if let Some(plan_id) = &query.plan_id {
        where_clause.push_str(" AND plan_id = ?");
        bindings.push(plan_id.clone());
    }
    if let Some(version_type) = query.version_type {
        where_clause.push_str(" AND version_type = ?");
        bindings.push(version_type.as_str().to_string());
    }
    if let Some(status) = query.status {
        where_clause.push_str(" AND status = ?");
        bindings.push(status.as_str().to_string());
    }

    let count_sql = format!("SELECT COUNT(*) FROM plan_versions{}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for binding in &bindings {
        count_query = count_query.bind(binding);
    }
    let total = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        r#"
        SELECT id, plan_id, version_number, version_type, status, total_value,
               total_units, created_by, created_at, submitted_at, approved_at
        FROM plan_versions{}
        ORDER BY created_at DESC, version_number DESC
        LIMIT ? OFFSET ?
        "#,
        where_clause
    );
    let mut list_query = sqlx::query_as::<_, PlanVersionSummary>(&list_sql);
    for binding in &bindings {
        list_query = list_query.bind(binding);
    }
    let versions = list_query.bind(limit).bind(offset).fetch_all(pool).await?;

    Ok((versions, total))
}

/// 플랜의 버전 타임라인: 버전 번호 오름차순, 각 항목에
/// 최근 변경 이력 수(최대 5로 캡)와 생성/제출/승인자 이름을 붙입니다.
pub async fn get_version_timeline(
    pool: &SqlitePool,
    plan_id: &str,
) -> Result<Vec<VersionTimelineEntry>, AppError> {
    let entries = sqlx::query_as::<_, VersionTimelineEntry>(
        r#"
        SELECT v.id, v.version_number, v.version_type, v.status, v.total_value,
               v.total_units, v.approval_comments, v.created_at, v.submitted_at,
               v.approved_at,
               (SELECT min(COUNT(*), 5) FROM version_changes c
                WHERE c.version_id = v.id) AS recent_change_count,
               cu.username AS created_by_name,
               su.username AS submitted_by_name,
               au.username AS approved_by_name
        FROM plan_versions v
        LEFT JOIN users cu ON cu.id = v.created_by
        LEFT JOIN users su ON su.id = v.submitted_by
        LEFT JOIN users au ON au.id = v.approved_by
        WHERE v.plan_id = ?
        ORDER BY v.version_number ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::plans;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        // 인메모리 DB는 연결마다 독립된 데이터베이스가 되므로 연결을 1개로 고정
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        // 테스트 공용 사용자
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind("u-planner")
        .bind("planner")
        .bind("x")
        .bind("BRAND_PLANNER")
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    async fn seed_plan(pool: &SqlitePool, name: &str) -> String {
        let req = CreatePlanRequest {
            name: name.to_string(),
            description: None,
            season: Some("SS26".to_string()),
        };
        plans::create_plan(pool, &req, "u-planner").await.unwrap().id
    }

    fn version_req(plan_id: &str, version_type: VersionType, value: f64, units: i64) -> CreateVersionRequest {
        CreateVersionRequest {
            plan_id: plan_id.to_string(),
            version_type,
            snapshot_data: serde_json::json!({ "lines": [] }),
            total_value: value,
            total_units: units,
            comments: None,
        }
    }

    #[tokio::test]
    async fn version_numbers_are_sequential_without_gaps() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "numbering").await;

        let mut numbers = Vec::new();
        for i in 0..4 {
            let req = version_req(&plan_id, VersionType::SystemProposed, 1000.0 * i as f64, 10 * i);
            let version = create_version(&pool, &req, "u-planner").await.unwrap();
            numbers.push(version.version_number);
        }

        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn create_for_missing_plan_is_not_found() {
        let pool = setup_test_db().await;
        let req = version_req("no-such-plan", VersionType::SystemProposed, 0.0, 0);
        let err = create_version(&pool, &req, "u-planner").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn new_version_supersedes_previous_regardless_of_status() {
        let pool = setup_test_db().await;

        // 이전 버전이 DRAFT인 경우
        let plan_a = seed_plan(&pool, "prior-draft").await;
        let v1 = create_version(&pool, &version_req(&plan_a, VersionType::SystemProposed, 1.0, 1), "u-planner")
            .await
            .unwrap();
        create_version(&pool, &version_req(&plan_a, VersionType::UserAdjusted, 2.0, 2), "u-planner")
            .await
            .unwrap();
        let v1 = get_version(&pool, &v1.id).await.unwrap().unwrap();
        assert_eq!(v1.status, VersionStatus::Superseded);

        // 이전 버전이 SUBMITTED인 경우
        let plan_b = seed_plan(&pool, "prior-submitted").await;
        let v1 = create_version(&pool, &version_req(&plan_b, VersionType::SystemProposed, 1.0, 1), "u-planner")
            .await
            .unwrap();
        submit_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        create_version(&pool, &version_req(&plan_b, VersionType::UserAdjusted, 2.0, 2), "u-planner")
            .await
            .unwrap();
        let v1 = get_version(&pool, &v1.id).await.unwrap().unwrap();
        assert_eq!(v1.status, VersionStatus::Superseded);

        // 이전 버전이 APPROVED인 경우에도 SUPERSEDED로 전환됩니다.
        let plan_c = seed_plan(&pool, "prior-approved").await;
        let v1 = create_version(&pool, &version_req(&plan_c, VersionType::SystemProposed, 1.0, 1), "u-planner")
            .await
            .unwrap();
        submit_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        approve_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        create_version(&pool, &version_req(&plan_c, VersionType::UserAdjusted, 2.0, 2), "u-planner")
            .await
            .unwrap();
        let v1 = get_version(&pool, &v1.id).await.unwrap().unwrap();
        assert_eq!(v1.status, VersionStatus::Superseded);
    }

    #[tokio::test]
    async fn version_type_cannot_regress() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "type-order").await;

        create_version(&pool, &version_req(&plan_id, VersionType::FinanceReviewed, 1.0, 1), "u-planner")
            .await
            .unwrap();

        let err = create_version(&pool, &version_req(&plan_id, VersionType::UserAdjusted, 2.0, 2), "u-planner")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        // 같은 단계는 리비전으로 허용됩니다.
        let revision =
            create_version(&pool, &version_req(&plan_id, VersionType::FinanceReviewed, 3.0, 3), "u-planner")
                .await
                .unwrap();
        assert_eq!(revision.version_number, 2);
    }

    #[tokio::test]
    async fn transition_preconditions_are_enforced() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "preconditions").await;
        let version = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 1.0, 1),
            "u-planner",
        )
        .await
        .unwrap();

        // DRAFT에서는 submit만 가능합니다.
        let err = review_version(&pool, &version.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        let err = approve_version(&pool, &version.id, "u-planner", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        let err = reject_version(&pool, &version.id, "no").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let version = submit_version(&pool, &version.id, "u-planner", Some("please review")).await.unwrap();
        assert_eq!(version.status, VersionStatus::Submitted);
        assert_eq!(version.submitted_by.as_deref(), Some("u-planner"));
        assert!(version.submitted_at.is_some());

        // SUBMITTED에서 다시 submit은 불가능합니다.
        let err = submit_version(&pool, &version.id, "u-planner", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let version = review_version(&pool, &version.id).await.unwrap();
        assert_eq!(version.status, VersionStatus::UnderReview);

        // UNDER_REVIEW에서 review를 반복할 수 없습니다.
        let err = review_version(&pool, &version.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        // UNDER_REVIEW에서 approve는 유효합니다.
        let version = approve_version(&pool, &version.id, "u-planner", Some("ok")).await.unwrap();
        assert_eq!(version.status, VersionStatus::Approved);

        // 종료 상태에서는 어떤 전이도 불가능합니다.
        let err = reject_version(&pool, &version.id, "too late").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn reject_requires_submitted_or_under_review_and_records_reason() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "reject").await;
        let version = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 1.0, 1),
            "u-planner",
        )
        .await
        .unwrap();

        submit_version(&pool, &version.id, "u-planner", None).await.unwrap();
        let version = reject_version(&pool, &version.id, "totals look wrong").await.unwrap();
        assert_eq!(version.status, VersionStatus::Rejected);
        assert_eq!(version.approval_comments.as_deref(), Some("totals look wrong"));
    }

    #[tokio::test]
    async fn approved_versions_are_immutable_via_update() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "immutable").await;
        let version = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 500.0, 50),
            "u-planner",
        )
        .await
        .unwrap();
        submit_version(&pool, &version.id, "u-planner", None).await.unwrap();
        approve_version(&pool, &version.id, "u-planner", None).await.unwrap();

        let patch = VersionPatch {
            snapshot_data: None,
            total_value: Some(999.0),
            total_units: None,
            approval_comments: None,
        };
        let err = update_version(&pool, &version.id, &patch).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // 저장된 레코드는 그대로여야 합니다.
        let stored = get_version(&pool, &version.id).await.unwrap().unwrap();
        assert_eq!(stored.total_value, 500.0);
        assert_eq!(stored.status, VersionStatus::Approved);
    }

    #[tokio::test]
    async fn update_patches_fields_but_never_status() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "patch").await;
        let version = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 100.0, 10),
            "u-planner",
        )
        .await
        .unwrap();

        let patch = VersionPatch {
            snapshot_data: Some(serde_json::json!({ "lines": [{ "sku": "A" }] })),
            total_value: Some(150.0),
            total_units: Some(15),
            approval_comments: Some("adjusted".to_string()),
        };
        let updated = update_version(&pool, &version.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.total_value, 150.0);
        assert_eq!(updated.total_units, 15);
        assert_eq!(updated.approval_comments.as_deref(), Some("adjusted"));
        assert_eq!(updated.status, VersionStatus::Draft);

        let missing = update_version(&pool, "no-such-version", &patch).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn approve_updates_version_and_plan_pointer_together() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "pointer").await;
        let version = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 1.0, 1),
            "u-planner",
        )
        .await
        .unwrap();

        // 사전 조건 위반으로 실패한 approve는 아무것도 바꾸지 않습니다.
        let err = approve_version(&pool, &version.id, "u-planner", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        let plan = plans::get_plan(&pool, &plan_id).await.unwrap().unwrap();
        assert_eq!(plan.current_version, 0);
        let stored = get_version(&pool, &version.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VersionStatus::Draft);

        submit_version(&pool, &version.id, "u-planner", None).await.unwrap();
        let approved = approve_version(&pool, &version.id, "u-planner", Some("ok")).await.unwrap();

        assert_eq!(approved.status, VersionStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("u-planner"));
        assert!(approved.approved_at.is_some());
        let plan = plans::get_plan(&pool, &plan_id).await.unwrap().unwrap();
        assert_eq!(plan.current_version, approved.version_number);
    }

    #[tokio::test]
    async fn list_versions_filters_and_paginates() {
        let pool = setup_test_db().await;
        let plan_a = seed_plan(&pool, "list-a").await;
        let plan_b = seed_plan(&pool, "list-b").await;

        for i in 0..5 {
            create_version(&pool, &version_req(&plan_a, VersionType::SystemProposed, i as f64, i), "u-planner")
                .await
                .unwrap();
        }
        create_version(&pool, &version_req(&plan_b, VersionType::UserAdjusted, 9.0, 9), "u-planner")
            .await
            .unwrap();

        let query = VersionListQuery {
            plan_id: Some(plan_a.clone()),
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let (rows, total) = list_versions(&pool, &query).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|v| v.plan_id == plan_a));

        // plan_a의 최신(5번)만 DRAFT, 나머지는 SUPERSEDED입니다.
        let query = VersionListQuery {
            plan_id: Some(plan_a.clone()),
            status: Some(VersionStatus::Draft),
            ..Default::default()
        };
        let (rows, total) = list_versions(&pool, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].version_number, 5);

        let query = VersionListQuery {
            version_type: Some(VersionType::UserAdjusted),
            ..Default::default()
        };
        let (rows, _) = list_versions(&pool, &query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plan_id, plan_b);
    }

    #[tokio::test]
    async fn timeline_is_ascending_with_identity_summaries() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "timeline").await;

        let v1 = create_version(&pool, &version_req(&plan_id, VersionType::SystemProposed, 1.0, 1), "u-planner")
            .await
            .unwrap();
        submit_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        approve_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        create_version(&pool, &version_req(&plan_id, VersionType::UserAdjusted, 2.0, 2), "u-planner")
            .await
            .unwrap();

        let timeline = get_version_timeline(&pool, &plan_id).await.unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].version_number, 1);
        assert_eq!(timeline[1].version_number, 2);
        assert_eq!(timeline[0].status, VersionStatus::Superseded);
        assert_eq!(timeline[0].created_by_name.as_deref(), Some("planner"));
        assert_eq!(timeline[0].approved_by_name.as_deref(), Some("planner"));
        assert_eq!(timeline[1].approved_by_name, None);
        assert_eq!(timeline[0].recent_change_count, 0);
    }

    // 생성 → 승인 → 차기 버전 생성 → 비교까지 한 번에 도는 시나리오
    #[tokio::test]
    async fn full_lifecycle_scenario() {
        let pool = setup_test_db().await;
        let plan_id = seed_plan(&pool, "e2e").await;

        let v1 = create_version(
            &pool,
            &version_req(&plan_id, VersionType::SystemProposed, 1_000_000.0, 500),
            "u-planner",
        )
        .await
        .unwrap();
        assert_eq!(v1.version_number, 1);
        assert_eq!(v1.status, VersionStatus::Draft);

        submit_version(&pool, &v1.id, "u-planner", None).await.unwrap();
        let v1 = approve_version(&pool, &v1.id, "u-planner", Some("ok")).await.unwrap();
        assert_eq!(v1.status, VersionStatus::Approved);
        assert_eq!(v1.approval_comments.as_deref(), Some("ok"));

        let plan = plans::get_plan(&pool, &plan_id).await.unwrap().unwrap();
        assert_eq!(plan.current_version, 1);

        let v2 = create_version(
            &pool,
            &version_req(&plan_id, VersionType::UserAdjusted, 1_200_000.0, 550),
            "u-planner",
        )
        .await
        .unwrap();
        assert_eq!(v2.version_number, 2);
        assert_eq!(v2.status, VersionStatus::Draft);

        let v1 = get_version(&pool, &v1.id).await.unwrap().unwrap();
        assert_eq!(v1.status, VersionStatus::Superseded);

        let comparison = crate::services::compare_versions(&v1, &v2, 0, 0);
        assert_eq!(comparison.differences.total_value.change, 200_000.0);
        assert_eq!(comparison.differences.total_value.change_percent, 20.0);
        assert_eq!(comparison.differences.total_units.change, 50.0);
    }
}
