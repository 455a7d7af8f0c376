use serde::{Deserialize, Serialize};

/// 버전에 귀속되는 필드 단위 변경 이력.
/// 생성만 가능하고 수정/삭제는 없습니다 (append-only 감사 로그).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VersionChange {
    pub id: String,
    pub version_id: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub field_name: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub change_reason: Option<String>,
    pub changed_at: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordChangeRequest {
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub field_name: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub change_reason: Option<String>,
}
