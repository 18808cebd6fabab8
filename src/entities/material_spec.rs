//! MaterialSpec entity

use super::enums::MaterialStatus;
use crate::dtos::{CreateMaterialSpecDTO, MaterialSpecQuery, UpdateMaterialSpecDTO};
use crate::repositories::filter::{Conditions, eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    pub id: RecordId,
    pub project_id: RecordId,
    pub name: String,
    pub category: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_cost: Option<f64>,
    pub status: MaterialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for MaterialSpec {
    type Create = CreateMaterialSpecDTO;
    type Update = UpdateMaterialSpecDTO;
    type Filter = MaterialSpecQuery;

    const TABLE: &'static str = "material_specs";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "name",
        "category",
        "manufacturer",
        "model",
        "specification",
        "quantity",
        "unit",
        "unit_cost",
        "status",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Material spec";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(
        id: RecordId,
        data: CreateMaterialSpecDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            project_id: data.project_id,
            name: data.name,
            category: data.category,
            manufacturer: data.manufacturer,
            model: data.model,
            specification: data.specification,
            quantity: data.quantity,
            unit: data.unit,
            unit_cost: data.unit_cost,
            status: data.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateMaterialSpecDTO, now: DateTime<Utc>) {
        patch(&mut self.name, data.name);
        patch(&mut self.category, data.category);
        patch_opt(&mut self.manufacturer, data.manufacturer);
        patch_opt(&mut self.model, data.model);
        patch_opt(&mut self.specification, data.specification);
        patch_opt(&mut self.quantity, data.quantity);
        patch_opt(&mut self.unit, data.unit);
        patch_opt(&mut self.unit_cost, data.unit_cost);
        patch(&mut self.status, data.status);
        self.updated_at = now;
    }

    fn matches(&self, filter: &MaterialSpecQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[
                Some(self.name.as_str()),
                self.manufacturer.as_deref(),
                Some(self.category.as_str()),
            ],
        ) && eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && eq_matches(filter.status.as_ref(), &self.status)
            && eq_matches(filter.category.as_deref(), self.category.as_str())
    }

    fn push_filters(filter: &MaterialSpecQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(
            &["name", "manufacturer", "category"],
            filter.search.as_deref(),
        );
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("status", filter.status);
        conditions.eq("category", filter.category.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.name)
            .push_bind(self.category)
            .push_bind(self.manufacturer)
            .push_bind(self.model)
            .push_bind(self.specification)
            .push_bind(self.quantity)
            .push_bind(self.unit)
            .push_bind(self.unit_cost)
            .push_bind(self.status)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
