//! Badge layout handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::layout::{BadgeLayoutConfig, generate_element_id, save_layout_config};

use super::super::state::AppState;

/// GET /api/layout - the active layout.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<BadgeLayoutConfig> {
    let layout = state.active_layout.read().await;
    Json(layout.clone())
}

#[derive(Debug, Serialize)]
pub struct SaveLayoutResponse {
    pub saved: bool,
    pub layout: BadgeLayoutConfig,
}

/// PUT /api/layout - replace the active layout and persist it.
///
/// The new layout becomes active even when the store rejects it. The
/// write guard is held across the save so the stored and active layouts
/// change together.
pub async fn put(
    State(state): State<Arc<AppState>>,
    Json(layout): Json<BadgeLayoutConfig>,
) -> Json<SaveLayoutResponse> {
    for id in layout.out_of_bounds() {
        tracing::debug!(element = id, "layout element positioned off the page");
    }

    let mut active = state.active_layout.write().await;
    let saved = match save_layout_config(state.store.as_ref(), &layout) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to save badge layout, keeping it in memory");
            false
        }
    };
    *active = layout.clone();
    Json(SaveLayoutResponse { saved, layout })
}

/// POST /api/layout/elements/id - a fresh text element id.
pub async fn new_element_id() -> Json<Value> {
    Json(json!({ "id": generate_element_id() }))
}
