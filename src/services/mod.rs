//! Services module - HTTP handlers
//!
//! Every resource goes through the same handlers in [`crud`], monomorphized
//! per entity through [`RestResource`]. Per-resource behaviour (defaults taken
//! from the demo user, realtime fan-out after a write) lives in [`hooks`].

pub mod crud;
pub mod hooks;
pub mod system;

pub use system::{banner, fallback, health, method_not_allowed};

use crate::core::{AppState, CurrentUser};
use crate::entities::ResourceKind;
use crate::repositories::{Resource, Store};
use axum::{Router, routing::get};
use std::sync::Arc;

/// A [`Resource`] served under `/api/v1/{segment}`
pub trait RestResource: Resource {
    const KIND: ResourceKind;

    /// Used in list messages ("Projects retrieved successfully")
    const PLURAL: &'static str;

    fn store(state: &AppState) -> &Store<Self>;

    /// Fills request fields the client may omit
    fn prepare_create(_data: &mut Self::Create, _user: &CurrentUser) {}

    // Realtime triggers, run after a successful write when broadcasts are enabled

    fn created(_state: &AppState, _record: &Self, _user: &CurrentUser) {}

    fn updated(_state: &AppState, _record: &Self, _user: &CurrentUser) {}

    fn deleted(_state: &AppState, _id: &str, _user: &CurrentUser) {}
}

/// list, get, create, update, delete
pub fn resource_routes<R: RestResource>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(crud::list::<R>).post(crud::create::<R>))
        .route(
            "/{id}",
            get(crud::get::<R>)
                .put(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}

/// list, get, create
pub fn append_only_routes<R: RestResource>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(crud::list::<R>).post(crud::create::<R>))
        .route("/{id}", get(crud::get::<R>))
}

/// Path under which a resource is mounted
pub fn mount_path(kind: ResourceKind) -> String {
    format!("/api/v1/{}", kind.segment())
}
