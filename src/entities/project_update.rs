//! ProjectUpdate entity - progress posts on a project's feed

use super::enums::UpdateType;
use crate::dtos::{CreateProjectUpdateDTO, ProjectUpdateQuery, UpdateProjectUpdateDTO};
use crate::repositories::filter::{Conditions, eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub id: RecordId,
    pub project_id: RecordId,
    pub title: String,
    pub content: String,
    pub update_type: UpdateType,
    pub author_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for ProjectUpdate {
    type Create = CreateProjectUpdateDTO;
    type Update = UpdateProjectUpdateDTO;
    type Filter = ProjectUpdateQuery;

    const TABLE: &'static str = "project_updates";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "content",
        "update_type",
        "author_id",
        "created_at",
        "updated_at",
    ];
    const SORT_COLUMN: &'static str = "created_at";
    const LABEL: &'static str = "Project update";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(
        id: RecordId,
        data: CreateProjectUpdateDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            project_id: data.project_id,
            title: data.title,
            content: data.content,
            update_type: data.update_type.unwrap_or_default(),
            author_id: data.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateProjectUpdateDTO, now: DateTime<Utc>) {
        patch(&mut self.title, data.title);
        patch(&mut self.content, data.content);
        patch(&mut self.update_type, data.update_type);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ProjectUpdateQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[Some(self.title.as_str()), Some(self.content.as_str())],
        ) && eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && eq_matches(filter.update_type.as_ref(), &self.update_type)
    }

    fn push_filters(filter: &ProjectUpdateQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["title", "content"], filter.search.as_deref());
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("update_type", filter.update_type);
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.title)
            .push_bind(self.content)
            .push_bind(self.update_type)
            .push_bind(self.author_id)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
