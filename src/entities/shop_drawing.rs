//! ShopDrawing entity - fabrication drawings submitted for approval

use super::enums::DrawingStatus;
use crate::dtos::{CreateShopDrawingDTO, ShopDrawingQuery, UpdateShopDrawingDTO};
use crate::repositories::filter::{Conditions, eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

pub const INITIAL_REVISION: &str = "A";

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShopDrawing {
    pub id: RecordId,
    pub project_id: RecordId,
    pub title: String,
    pub drawing_number: String,
    pub revision: String,
    pub status: DrawingStatus,
    pub submitted_by: Option<RecordId>,
    pub reviewed_by: Option<RecordId>,
    pub file_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for ShopDrawing {
    type Create = CreateShopDrawingDTO;
    type Update = UpdateShopDrawingDTO;
    type Filter = ShopDrawingQuery;

    const TABLE: &'static str = "shop_drawings";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "drawing_number",
        "revision",
        "status",
        "submitted_by",
        "reviewed_by",
        "file_url",
        "notes",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Shop drawing";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(
        id: RecordId,
        data: CreateShopDrawingDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            project_id: data.project_id,
            title: data.title,
            drawing_number: data.drawing_number,
            revision: data
                .revision
                .unwrap_or_else(|| INITIAL_REVISION.to_string()),
            status: data.status.unwrap_or_default(),
            submitted_by: data.submitted_by,
            reviewed_by: data.reviewed_by,
            file_url: data.file_url,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateShopDrawingDTO, now: DateTime<Utc>) {
        patch(&mut self.title, data.title);
        patch(&mut self.drawing_number, data.drawing_number);
        patch(&mut self.revision, data.revision);
        patch(&mut self.status, data.status);
        patch_opt(&mut self.submitted_by, data.submitted_by);
        patch_opt(&mut self.reviewed_by, data.reviewed_by);
        patch_opt(&mut self.file_url, data.file_url);
        patch_opt(&mut self.notes, data.notes);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ShopDrawingQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[Some(self.title.as_str()), Some(self.drawing_number.as_str())],
        ) && eq_matches(filter.project_id.as_deref(), self.project_id.as_str())
            && eq_matches(filter.status.as_ref(), &self.status)
    }

    fn push_filters(filter: &ShopDrawingQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["title", "drawing_number"], filter.search.as_deref());
        conditions.eq("project_id", filter.project_id.clone());
        conditions.eq("status", filter.status);
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.project_id)
            .push_bind(self.title)
            .push_bind(self.drawing_number)
            .push_bind(self.revision)
            .push_bind(self.status)
            .push_bind(self.submitted_by)
            .push_bind(self.reviewed_by)
            .push_bind(self.file_url)
            .push_bind(self.notes)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
