//! Procurement DTOs

use crate::entities::ProcurementStatus;
use crate::repositories::RecordId;
use chrono::NaiveDate;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcurementItemDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "projectId is required"))]
    pub project_id: RecordId,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub supplier: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub total_cost: Option<f64>,
    pub status: Option<ProcurementStatus>,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcurementItemDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub supplier: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub total_cost: Option<f64>,
    pub status: Option<ProcurementStatus>,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementQuery {
    pub search: Option<String>,
    pub project_id: Option<RecordId>,
    pub status: Option<ProcurementStatus>,
}
