use crate::error::AppError;
use crate::models::{RecordChangeRequest, VersionChange};
use sqlx::SqlitePool;

/// 변경 이력 한 건을 추가합니다. 이력은 append-only입니다 —
/// 버전이 APPROVED 같은 종료 상태여도 기록할 수 있습니다
/// (데이터 수정이 아니라 감사 기록이기 때문입니다).
pub async fn record_change(
    pool: &SqlitePool,
    version_id: &str,
    req: &RecordChangeRequest,
) -> Result<VersionChange, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO version_changes
            (id, version_id, entity_type, entity_id, field_name,
             previous_value, new_value, change_reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(version_id)
    .bind(&req.entity_type)
    .bind(&req.entity_id)
    .bind(&req.field_name)
    .bind(&req.previous_value)
    .bind(&req.new_value)
    .bind(&req.change_reason)
    .execute(pool)
    .await?;

    let change = sqlx::query_as::<_, VersionChange>(
        r#"
        SELECT id, version_id, entity_type, entity_id, field_name,
               previous_value, new_value, change_reason, changed_at
        FROM version_changes
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_optional(pool)
    .await?;

    change.ok_or(AppError::Internal("Failed to retrieve recorded change".to_string()))
}

/// 버전의 변경 이력을 최신순으로 조회합니다.
pub async fn list_changes(
    pool: &SqlitePool,
    version_id: &str,
) -> Result<Vec<VersionChange>, AppError> {
    let changes = sqlx::query_as::<_, VersionChange>(
        r#"
        SELECT id, version_id, entity_type, entity_id, field_name,
               previous_value, new_value, change_reason, changed_at
        FROM version_changes
        WHERE version_id = ?
        ORDER BY changed_at DESC, rowid DESC
        "#,
        // rowid DESC: 같은 밀리초에 기록된 이력의 순서를 안정화합니다.
    )
    .bind(version_id)
    .fetch_all(pool)
    .await?;

    Ok(changes)
}

pub async fn count_changes(pool: &SqlitePool, version_id: &str) -> Result<i64, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM version_changes WHERE version_id = ?")
            .bind(version_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{plans, versions};
    use crate::models::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> (SqlitePool, String) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

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

        let plan = plans::create_plan(
            &pool,
            &CreatePlanRequest {
                name: "changes".to_string(),
                description: None,
                season: None,
            },
            "u-planner",
        )
        .await
        .unwrap();

        let version = versions::create_version(
            &pool,
            &CreateVersionRequest {
                plan_id: plan.id,
                version_type: VersionType::SystemProposed,
                snapshot_data: serde_json::json!({}),
                total_value: 100.0,
                total_units: 10,
                comments: None,
            },
            "u-planner",
        )
        .await
        .unwrap();

        (pool, version.id)
    }

    fn change_req(field: &str, old: &str, new: &str) -> RecordChangeRequest {
        RecordChangeRequest {
            entity_type: "otb_line".to_string(),
            entity_id: Some("line-1".to_string()),
            field_name: field.to_string(),
            previous_value: Some(old.to_string()),
            new_value: Some(new.to_string()),
            change_reason: Some("forecast update".to_string()),
        }
    }

    #[tokio::test]
    async fn changes_are_listed_newest_first() {
        let (pool, version_id) = setup_test_db().await;

        record_change(&pool, &version_id, &change_req("budget", "100", "120")).await.unwrap();
        record_change(&pool, &version_id, &change_req("units", "10", "12")).await.unwrap();
        record_change(&pool, &version_id, &change_req("budget", "120", "130")).await.unwrap();

        let changes = list_changes(&pool, &version_id).await.unwrap();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].previous_value.as_deref(), Some("120"));
        assert_eq!(changes[2].previous_value.as_deref(), Some("100"));
        assert_eq!(count_changes(&pool, &version_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn changes_can_be_recorded_against_approved_versions() {
        let (pool, version_id) = setup_test_db().await;

        versions::submit_version(&pool, &version_id, "u-planner", None).await.unwrap();
        versions::approve_version(&pool, &version_id, "u-planner", None).await.unwrap();

        // 감사 로그이므로 종료 상태 버전에도 기록이 허용됩니다.
        let change = record_change(&pool, &version_id, &change_req("budget", "100", "99"))
            .await
            .unwrap();
        assert_eq!(change.version_id, version_id);
        assert_eq!(change.field_name, "budget");
        assert!(!change.changed_at.is_empty());
    }
}
