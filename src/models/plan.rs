use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// 시즌 태그 (예: "SS26", "FW26")
    pub season: Option<String>,
    /// 마지막으로 승인된 버전 번호. 0이면 아직 승인된 버전이 없습니다.
    /// approve 연산에서 해당 버전의 status와 같은 트랜잭션으로 갱신됩니다.
    pub current_version: i64,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub season: Option<String>,
}
