//! Activity entity - append-only audit log entry

use crate::dtos::{ActivityQuery, CreateActivityDTO};
use crate::repositories::filter::{Conditions, eq_matches, opt_eq_matches};
use crate::repositories::{Immutable, RecordId, Resource, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: RecordId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Activity {
    type Create = CreateActivityDTO;
    type Update = Immutable;
    type Filter = ActivityQuery;

    const TABLE: &'static str = "activities";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "action",
        "entity_type",
        "entity_id",
        "project_id",
        "user_id",
        "description",
        "metadata",
        "created_at",
        "updated_at",
    ];
    const SORT_COLUMN: &'static str = "created_at";
    const LABEL: &'static str = "Activity";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: RecordId, data: CreateActivityDTO, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            action: data.action,
            entity_type: data.entity_type,
            entity_id: data.entity_id,
            project_id: data.project_id,
            user_id: data.user_id,
            description: data.description,
            metadata: data.metadata,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: Immutable, _now: DateTime<Utc>) {
        match data {}
    }

    fn matches(&self, filter: &ActivityQuery) -> bool {
        opt_eq_matches(filter.project_id.as_deref(), self.project_id.as_deref())
            && opt_eq_matches(filter.user_id.as_deref(), self.user_id.as_deref())
            && eq_matches(filter.entity_type.as_deref(), self.entity_type.as_str())
            && eq_matches(filter.action.as_deref(), self.action.as_str())
    }

    fn push_filters(filter: &ActivityQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("user_id", filter.user_id.clone());
        conditions.eq("entity_type", filter.entity_type.clone());
        conditions.eq("action", filter.action.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.action)
            .push_bind(self.entity_type)
            .push_bind(self.entity_id)
            .push_bind(self.project_id)
            .push_bind(self.user_id)
            .push_bind(self.description)
            .push_bind(self.metadata)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
