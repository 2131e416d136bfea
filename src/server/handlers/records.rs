//! Record and event layout handlers backed by the in-memory repository.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::fields::ValueMap;
use crate::layout::BadgeLayoutConfig;
use crate::print::{BadgeRecord, BadgeRepository};

use super::super::state::AppState;
use super::{ApiError, api_error, parse_kind};

/// GET /api/records/:kind/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<BadgeRecord>, ApiError> {
    let record = state
        .records
        .get_record(parse_kind(&kind)?, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(record))
}

/// PUT /api/records/:kind/:id - set a record's values.
///
/// An existing record keeps its badge id and print marker.
pub async fn put(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
    Json(values): Json<ValueMap>,
) -> Result<Json<BadgeRecord>, ApiError> {
    let record = state.records.set_values(parse_kind(&kind)?, id, values).await;
    Ok(Json(record))
}

/// POST /api/records/:kind - create a record under a fresh id.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(values): Json<ValueMap>,
) -> Result<(StatusCode, Json<BadgeRecord>), ApiError> {
    let record = BadgeRecord::new(parse_kind(&kind)?, Uuid::new_v4().to_string(), values);
    state.records.upsert_record(record.clone()).await;
    tracing::debug!(kind = %record.kind, id = %record.id, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/events/:id/layout - save an event's badge layout.
pub async fn put_event_layout(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(layout): Json<BadgeLayoutConfig>,
) -> StatusCode {
    state.records.put_event_layout(event_id, layout).await;
    StatusCode::NO_CONTENT
}
