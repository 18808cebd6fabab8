//! Project DTOs

use crate::entities::{ProjectStatus, ProjectType};
use crate::repositories::RecordId;
use chrono::NaiveDate;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(required(message = "type is required"))]
    pub project_type: Option<ProjectType>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub client_id: Option<RecordId>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
    /// Stamped from the request identity, never read from the body
    #[serde(skip)]
    pub created_by: Option<RecordId>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub client_id: Option<RecordId>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub client_id: Option<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_fields_fail_validation() {
        let dto: CreateProjectDTO = serde_json::from_str(r#"{"type":"commercial"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let dto: CreateProjectDTO = serde_json::from_str(r#"{"name":"Depot"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("project_type"));
    }

    #[test]
    fn test_blank_text_is_trimmed_then_rejected() {
        let dto: CreateProjectDTO =
            serde_json::from_str(r#"{"name":"   ","type":"commercial"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let dto: CreateProjectDTO =
            serde_json::from_str(r#"{"name":"  Depot ","type":"industrial"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.name, "Depot");

        let dto: UpdateProjectDTO = serde_json::from_str(r#"{"name":" "}"#).unwrap();
        assert!(dto.validate().is_err());
        let dto: UpdateProjectDTO = serde_json::from_str(r#"{}"#).unwrap();
        assert!(dto.name.is_none());
    }

    #[test]
    fn test_progress_range() {
        let dto: UpdateProjectDTO = serde_json::from_str(r#"{"progress":140}"#).unwrap();
        assert!(dto.validate().is_err());
        let dto: UpdateProjectDTO = serde_json::from_str(r#"{"progress":100}"#).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_created_by_is_not_read_from_body() {
        let dto: CreateProjectDTO = serde_json::from_str(
            r#"{"name":"Depot","type":"industrial","createdBy":"99"}"#,
        )
        .unwrap();
        assert!(dto.created_by.is_none());
    }
}
