//! Activity DTOs - the audit log only accepts new entries

use crate::repositories::RecordId;
use serde::Deserialize;
use super::trimmed;
use serde_json::Value;
use validator::Validate;

#[derive(Deserialize, Debug, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "action is required"))]
    pub action: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "entityType is required"))]
    pub entity_type: String,
    pub entity_id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    /// Defaults to the requesting user
    pub user_id: Option<RecordId>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub project_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
    pub entity_type: Option<String>,
    pub action: Option<String>,
}
