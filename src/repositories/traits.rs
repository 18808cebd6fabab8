//! Common repository traits
//!
//! The CRUD traits are implemented by both repository backends and by the
//! [`Store`](super::Store) that dispatches between them. [`Resource`] is the
//! per-entity contract those generic implementations are written against.

use super::StoreError;
use super::filter::Conditions;
use crate::dtos::Pagination;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};
use validator::{Validate, ValidationErrors};

/// Record identifiers are strings: UUIDs for new records, digits for fixtures
pub type RecordId = String;

pub fn new_record_id() -> RecordId {
    uuid::Uuid::new_v4().to_string()
}

/// Overwrites `slot` when the patch carries a value
pub fn patch<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Same as [`patch`] for nullable fields: a missing value never clears the field
pub fn patch_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Update payload of append-only resources. Uninhabited: no request body
/// ever deserializes into it.
#[derive(Debug, Deserialize)]
pub enum Immutable {}

impl Validate for Immutable {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match *self {}
    }
}

/// One page of a filtered listing plus the total number of matches
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Entity stored by the repositories.
///
/// Record construction ([`Resource::build`]) and patching ([`Resource::apply`])
/// live here so both backends produce identical records for the same request.
pub trait Resource:
    Clone + Serialize + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    type Create: DeserializeOwned + Validate + Send + Sync;
    type Update: DeserializeOwned + Validate + Send + Sync;
    type Filter: DeserializeOwned + Default + Send + Sync;

    const TABLE: &'static str;

    /// Selected columns, in the order [`Resource::bind_values`] binds them.
    /// Columns absent from this list are never returned.
    const COLUMNS: &'static [&'static str];

    /// Listing order is this column descending, then `id` ascending
    const SORT_COLUMN: &'static str = "updated_at";

    /// Used in response messages
    const LABEL: &'static str;

    fn id(&self) -> &str;

    /// Value of `SORT_COLUMN`, for the in-memory ordering
    fn sort_key(&self) -> DateTime<Utc>;

    fn build(id: RecordId, data: Self::Create, now: DateTime<Utc>) -> Result<Self, StoreError>;

    /// Applies the `Some` fields of the patch and bumps `updated_at`
    fn apply(&mut self, data: Self::Update, now: DateTime<Utc>);

    /// In-memory evaluation of the filter
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// SQL evaluation of the same filter
    fn push_filters(filter: &Self::Filter, conditions: &mut Conditions<'_, '_>);

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>);

    /// Written on insert but never selected (e.g. password hashes)
    fn hidden_values(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Key of the unique constraint the entity carries, if any
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Trait for creating new entities
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the repository)
/// * `CreateDTO` - DTO for creation (without ID)
pub trait Create<Entity, CreateDTO> {
    /// # Returns
    /// * `Ok(Entity)` - Created entity
    /// * `Err(StoreError::Conflict)` - A unique key is already taken
    async fn create(&self, data: CreateDTO) -> Result<Entity, StoreError>;
}

/// Trait for reading a single entity by primary key
pub trait Read<Entity> {
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    async fn read(&self, id: &str) -> Result<Option<Entity>, StoreError>;
}

/// Trait for listing entities with filters and pagination
pub trait List<Entity, Filter> {
    /// Filters are applied before pagination; `Page::total` counts every match
    async fn list(&self, filter: &Filter, pagination: Pagination)
    -> Result<Page<Entity>, StoreError>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating (only `Some(_)` fields are modified)
pub trait Update<Entity, UpdateDTO> {
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(StoreError::NotFound)` - No entity with that ID
    async fn update(&self, id: &str, data: UpdateDTO) -> Result<Entity, StoreError>;
}

/// Trait for deleting entities
pub trait Delete {
    /// # Returns
    /// * `Ok(())` - Deletion successful
    /// * `Err(StoreError::NotFound)` - No entity with that ID
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
