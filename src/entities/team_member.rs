//! TeamMember entity - a user assigned to a project with a site role.
//! A user appears at most once per project.

use crate::dtos::{CreateTeamMemberDTO, TeamMemberQuery, UpdateTeamMemberDTO};
use crate::repositories::filter::{Conditions, eq_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: RecordId,
    pub project_id: RecordId,
    pub user_id: RecordId,
    /// Free text, e.g. `site_manager`
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for TeamMember {
    type Create = CreateTeamMemberDTO;
    type Update = UpdateTeamMemberDTO;
    type Filter = TeamMemberQuery;

    const TABLE: &'static str = "team_members";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "user_id",
        "role",
        "created_at",
        "updated_at",
    ];
    const SORT_COLUMN: &'static str = "created_at";
    const LABEL: &'static str = "Team member";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(
        id: RecordId,
        data: CreateTeamMemberDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            project_id: data.project_id,
            user_id: data.user_id,
            role: data.role,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateTeamMemberDTO, now: DateTime<Utc>) {
        patch(&mut self.role, data.role);
        self.updated_at = now;
    }

    fn matches(&self, filter: &TeamMemberQuery) -> bool {
        eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && eq_matches(filter.user_id.as_deref(), self.user_id.as_str())
            && eq_matches(filter.role.as_deref(), self.role.as_str())
    }

    fn push_filters(filter: &TeamMemberQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("user_id", filter.user_id.clone());
        conditions.eq("role", filter.role.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.user_id)
            .push_bind(self.role)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn unique_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.project_id, self.user_id))
    }
}
