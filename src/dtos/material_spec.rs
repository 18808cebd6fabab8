//! MaterialSpec DTOs

use crate::entities::MaterialStatus;
use crate::repositories::RecordId;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialSpecDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "projectId is required"))]
    pub project_id: RecordId,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub specification: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
    pub status: Option<MaterialStatus>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialSpecDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub specification: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
    pub status: Option<MaterialStatus>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpecQuery {
    pub search: Option<String>,
    pub project_id: Option<RecordId>,
    pub status: Option<MaterialStatus>,
    pub category: Option<String>,
}
