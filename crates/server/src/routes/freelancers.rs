use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{validate_insert, validate_partial, Freelancer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Continuation token from a previous page (remote backend only).
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub ok: bool,
    pub list: Vec<Freelancer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub ok: bool,
    pub item: Freelancer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub ok: bool,
    pub deleted: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    // the memory backend ignores the offset and never returns one
    let page = state.store.list(q.offset).await?;
    info!(backend = %state.store.backend(), count = page.list.len(), "list freelancers");
    Ok(Json(ListResponse { ok: true, list: page.list, offset: page.offset }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    match state.store.get(&id).await? {
        Some(item) => Ok(Json(ItemResponse { ok: true, item })),
        None => Err(ApiError::not_found()),
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    // malformed JSON is a 400 with the usual envelope, not axum's plain text
    let Json(body) = payload?;
    // reject before touching the store
    let input = validate_insert(body)?;
    let item = state.store.create(input).await?;
    info!(backend = %state.store.backend(), id = %item.id, "created freelancer");
    Ok((StatusCode::CREATED, Json(ItemResponse { ok: true, item })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Json(body) = payload?;
    let patch = validate_partial(body)?;
    // unknown ids come back as NotFound (memory) or Remote (airtable)
    let item = state.store.update(&id, patch).await?;
    info!(backend = %state.store.backend(), %id, "updated freelancer");
    Ok(Json(ItemResponse { ok: true, item }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    // false: nothing was there
    if !state.store.delete(&id).await? {
        return Err(ApiError::not_found());
    }
    info!(backend = %state.store.backend(), %id, "deleted freelancer");
    Ok(Json(DeletedResponse { ok: true, deleted: id }))
}
