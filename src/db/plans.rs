use crate::error::AppError;
use crate::models::{CreatePlanRequest, Plan};
use sqlx::SqlitePool;

pub async fn create_plan(
    pool: &SqlitePool,
    req: &CreatePlanRequest,
    created_by: &str,
) -> Result<Plan, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO plans (id, name, description, season, created_by)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.season)
    .bind(created_by)
    .execute(pool)
    .await?;

    get_plan(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created plan".to_string()))
}

pub async fn get_plan(pool: &SqlitePool, id: &str) -> Result<Option<Plan>, AppError> {
    let plan = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, description, season, current_version, created_by,
               created_at, updated_at
        FROM plans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<Plan>, AppError> {
    let plans = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, description, season, current_version, created_by,
               created_at, updated_at
        FROM plans
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(plans)
}
