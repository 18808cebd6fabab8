//! ProcurementItem entity

use super::enums::ProcurementStatus;
use crate::dtos::{CreateProcurementItemDTO, ProcurementQuery, UpdateProcurementItemDTO};
use crate::repositories::filter::{Conditions, eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

pub const DEFAULT_QUANTITY: f64 = 1.0;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementItem {
    pub id: RecordId,
    pub project_id: RecordId,
    pub name: String,
    pub supplier: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub total_cost: Option<f64>,
    pub status: ProcurementStatus,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcurementItem {
    fn derived_total(&self) -> Option<f64> {
        self.unit_price.map(|price| price * self.quantity)
    }
}

impl Resource for ProcurementItem {
    type Create = CreateProcurementItemDTO;
    type Update = UpdateProcurementItemDTO;
    type Filter = ProcurementQuery;

    const TABLE: &'static str = "procurement_items";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "name",
        "supplier",
        "quantity",
        "unit",
        "unit_price",
        "total_cost",
        "status",
        "order_date",
        "expected_delivery",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Procurement item";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(
        id: RecordId,
        data: CreateProcurementItemDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let mut item = Self {
            id,
            project_id: data.project_id,
            name: data.name,
            supplier: data.supplier,
            quantity: data.quantity.unwrap_or(DEFAULT_QUANTITY),
            unit: data.unit,
            unit_price: data.unit_price,
            total_cost: data.total_cost,
            status: data.status.unwrap_or_default(),
            order_date: data.order_date,
            expected_delivery: data.expected_delivery,
            created_at: now,
            updated_at: now,
        };
        if item.total_cost.is_none() {
            item.total_cost = item.derived_total();
        }
        Ok(item)
    }

    /// An explicit `totalCost` wins; otherwise a new quantity or unit price
    /// re-derives it
    fn apply(&mut self, data: UpdateProcurementItemDTO, now: DateTime<Utc>) {
        let reprice = data.total_cost.is_none()
            && (data.quantity.is_some() || data.unit_price.is_some());

        patch(&mut self.name, data.name);
        patch_opt(&mut self.supplier, data.supplier);
        patch(&mut self.quantity, data.quantity);
        patch_opt(&mut self.unit, data.unit);
        patch_opt(&mut self.unit_price, data.unit_price);
        patch_opt(&mut self.total_cost, data.total_cost);
        patch(&mut self.status, data.status);
        patch_opt(&mut self.order_date, data.order_date);
        patch_opt(&mut self.expected_delivery, data.expected_delivery);

        if reprice {
            if let Some(total) = self.derived_total() {
                self.total_cost = Some(total);
            }
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &ProcurementQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[Some(self.name.as_str()), self.supplier.as_deref()],
        ) && eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && eq_matches(filter.status.as_ref(), &self.status)
    }

    fn push_filters(filter: &ProcurementQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["name", "supplier"], filter.search.as_deref());
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("status", filter.status);
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.name)
            .push_bind(self.supplier)
            .push_bind(self.quantity)
            .push_bind(self.unit)
            .push_bind(self.unit_price)
            .push_bind(self.total_cost)
            .push_bind(self.status)
            .push_bind(self.order_date)
            .push_bind(self.expected_delivery)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
