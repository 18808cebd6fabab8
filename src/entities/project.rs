//! Project entity

use super::enums::{ProjectStatus, ProjectType};
use crate::dtos::{CreateProjectDTO, ProjectQuery, UpdateProjectDTO};
use crate::repositories::filter::{Conditions, eq_matches, opt_eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub client_id: Option<RecordId>,
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Completion percentage, 0 to 100
    pub progress: i32,
    pub created_by: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Project {
    type Create = CreateProjectDTO;
    type Update = UpdateProjectDTO;
    type Filter = ProjectQuery;

    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "project_type",
        "description",
        "status",
        "client_id",
        "budget",
        "location",
        "start_date",
        "end_date",
        "progress",
        "created_by",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(id: RecordId, data: CreateProjectDTO, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            name: data.name,
            project_type: data.project_type.unwrap_or_default(),
            description: data.description,
            status: data.status.unwrap_or_default(),
            client_id: data.client_id,
            budget: data.budget,
            location: data.location,
            start_date: data.start_date,
            end_date: data.end_date,
            progress: data.progress.unwrap_or(0),
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateProjectDTO, now: DateTime<Utc>) {
        patch(&mut self.name, data.name);
        patch(&mut self.project_type, data.project_type);
        patch_opt(&mut self.description, data.description);
        patch(&mut self.status, data.status);
        patch_opt(&mut self.client_id, data.client_id);
        patch_opt(&mut self.budget, data.budget);
        patch_opt(&mut self.location, data.location);
        patch_opt(&mut self.start_date, data.start_date);
        patch_opt(&mut self.end_date, data.end_date);
        patch(&mut self.progress, data.progress);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ProjectQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[
                Some(self.name.as_str()),
                self.description.as_deref(),
                self.location.as_deref(),
            ],
        ) && eq_matches(filter.status.as_ref(), &self.status)
            && eq_matches(filter.project_type.as_ref(), &self.project_type)
            && opt_eq_matches(filter.client_id.as_deref(), self.client_id.as_deref())
    }

    fn push_filters(filter: &ProjectQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(
            &["name", "description", "location"],
            filter.search.as_deref(),
        );
        conditions.eq("status", filter.status);
        conditions.eq("project_type", filter.project_type);
        conditions.eq("client_id", filter.client_id.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name)
            .push_bind(self.project_type)
            .push_bind(self.description)
            .push_bind(self.status)
            .push_bind(self.client_id)
            .push_bind(self.budget)
            .push_bind(self.location)
            .push_bind(self.start_date)
            .push_bind(self.end_date)
            .push_bind(self.progress)
            .push_bind(self.created_by)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults_to_draft_with_no_progress() {
        let data: CreateProjectDTO =
            serde_json::from_str(r#"{"name":"Test","type":"commercial","clientId":"2"}"#).unwrap();
        let project = Project::build("9".to_string(), data, Utc::now()).unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.progress, 0);
        assert_eq!(project.client_id.as_deref(), Some("2"));

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["type"], "commercial");
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let data: CreateProjectDTO = serde_json::from_str(
            r#"{"name":"Tower","type":"residential","location":"Harbour"}"#,
        )
        .unwrap();
        let created = Utc::now();
        let mut project = Project::build("9".to_string(), data, created).unwrap();

        let patch: UpdateProjectDTO =
            serde_json::from_str(r#"{"status":"on_hold","progress":40}"#).unwrap();
        let later = created + chrono::Duration::seconds(5);
        project.apply(patch, later);

        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.progress, 40);
        assert_eq!(project.name, "Tower");
        assert_eq!(project.location.as_deref(), Some("Harbour"));
        assert_eq!(project.updated_at, later);
        assert_eq!(project.created_at, created);
    }
}
