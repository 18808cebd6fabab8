//! Task entity

use super::enums::{TaskPriority, TaskStatus};
use crate::dtos::{CreateTaskDTO, TaskQuery, UpdateTaskDTO};
use crate::repositories::filter::{Conditions, eq_matches, opt_eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub project_id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<RecordId>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Task {
    type Create = CreateTaskDTO;
    type Update = UpdateTaskDTO;
    type Filter = TaskQuery;

    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "description",
        "status",
        "priority",
        "assignee_id",
        "due_date",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(id: RecordId, data: CreateTaskDTO, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or_default(),
            priority: data.priority.unwrap_or_default(),
            assignee_id: data.assignee_id,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateTaskDTO, now: DateTime<Utc>) {
        patch(&mut self.project_id, data.project_id);
        patch(&mut self.title, data.title);
        patch_opt(&mut self.description, data.description);
        patch(&mut self.status, data.status);
        patch(&mut self.priority, data.priority);
        patch_opt(&mut self.assignee_id, data.assignee_id);
        patch_opt(&mut self.due_date, data.due_date);
        self.updated_at = now;
    }

    fn matches(&self, filter: &TaskQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[Some(self.title.as_str()), self.description.as_deref()],
        ) && eq_matches(filter.status.as_ref(), &self.status)
            && eq_matches(filter.priority.as_ref(), &self.priority)
            && eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && opt_eq_matches(filter.assignee_id.as_deref(), self.assignee_id.as_deref())
    }

    fn push_filters(filter: &TaskQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["title", "description"], filter.search.as_deref());
        conditions.eq("status", filter.status);
        conditions.eq("priority", filter.priority);
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("assignee_id", filter.assignee_id.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.title)
            .push_bind(self.description)
            .push_bind(self.status)
            .push_bind(self.priority)
            .push_bind(self.assignee_id)
            .push_bind(self.due_date)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
