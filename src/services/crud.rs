//! Generic CRUD handlers shared by every resource

use super::RestResource;
use crate::core::response::{ApiResponse, PaginatedResponse, Reply};
use crate::core::{
    AppError, AppQuery, AppState, CurrentUser, RecordIdPath, ValidatedJson, paginated_response,
    success_response,
};
use crate::dtos::PaginationQuery;
use crate::repositories::{Create, Delete, List, Read, Update};
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, pagination, filter), fields(resource = R::TABLE))]
pub async fn list<R: RestResource>(
    State(state): State<Arc<AppState>>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
    AppQuery(filter): AppQuery<R::Filter>,
) -> Result<Reply<PaginatedResponse<R>>, AppError> {
    let pagination = pagination.resolve();
    debug!(page = pagination.page, limit = pagination.limit, "Listing records");

    let page = R::store(&state)
        .list(&filter, pagination)
        .await
        .map_err(|e| AppError::from_store(e, R::LABEL))?;

    debug!(returned = page.items.len(), total = page.total, "Records listed");
    Ok(paginated_response(
        page.items,
        pagination,
        page.total,
        format!("{} retrieved successfully", R::PLURAL),
    ))
}

#[instrument(skip(state), fields(resource = R::TABLE))]
pub async fn get<R: RestResource>(
    State(state): State<Arc<AppState>>,
    RecordIdPath(id): RecordIdPath,
) -> Result<Reply<ApiResponse<R>>, AppError> {
    let record = R::store(&state)
        .read(&id)
        .await
        .map_err(|e| AppError::from_store(e, R::LABEL))?
        .ok_or_else(|| AppError::not_found(format!("{} not found", R::LABEL)))?;

    Ok(success_response(
        record,
        format!("{} retrieved successfully", R::LABEL),
    ))
}

#[instrument(skip(state, user, data), fields(resource = R::TABLE, user_id = %user.id))]
pub async fn create<R: RestResource>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(mut data): ValidatedJson<R::Create>,
) -> Result<Reply<ApiResponse<R>>, AppError> {
    R::prepare_create(&mut data, &user);

    let record = R::store(&state)
        .create(data)
        .await
        .map_err(|e| AppError::from_store(e, R::LABEL))?;
    info!(id = record.id(), "Record created");

    if state.broadcasts_enabled() {
        R::created(&state, &record, &user);
    }

    Ok(success_response(record, format!("{} created successfully", R::LABEL))
        .with_status(StatusCode::CREATED))
}

#[instrument(skip(state, user, data), fields(resource = R::TABLE, user_id = %user.id))]
pub async fn update<R: RestResource>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    RecordIdPath(id): RecordIdPath,
    ValidatedJson(data): ValidatedJson<R::Update>,
) -> Result<Reply<ApiResponse<R>>, AppError> {
    let record = R::store(&state)
        .update(&id, data)
        .await
        .map_err(|e| AppError::from_store(e, R::LABEL))?;
    info!("Record updated");

    if state.broadcasts_enabled() {
        R::updated(&state, &record, &user);
    }

    Ok(success_response(record, format!("{} updated successfully", R::LABEL)))
}

#[instrument(skip(state, user), fields(resource = R::TABLE, user_id = %user.id))]
pub async fn delete<R: RestResource>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    RecordIdPath(id): RecordIdPath,
) -> Result<Reply<ApiResponse<Value>>, AppError> {
    R::store(&state)
        .delete(&id)
        .await
        .map_err(|e| AppError::from_store(e, R::LABEL))?;
    info!("Record deleted");

    if state.broadcasts_enabled() {
        R::deleted(&state, &id, &user);
    }

    Ok(success_response(
        json!({ "id": id }),
        format!("{} deleted successfully", R::LABEL),
    ))
}
