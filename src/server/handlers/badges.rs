//! Badge preview, rendering and printing handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::barcode::parse_barcode;
use crate::compose::{BadgeGenerationRequest, DrawList, compose};
use crate::print::PrintRequest;
use crate::render::render_pdf;

use super::super::state::AppState;
use super::{ApiError, api_error, parse_kind};

pub const BARCODE_HEADER: &str = "x-badge-barcode";
pub const STATUS_HEADER: &str = "x-badge-status";

/// Use the active layout when the request carries none.
async fn with_active_layout(
    state: &AppState,
    mut req: BadgeGenerationRequest,
) -> BadgeGenerationRequest {
    if req.layout.is_none() {
        req.layout = Some(state.active_layout.read().await.clone());
    }
    req
}

/// POST /api/badges/preview - the composed draw list as JSON.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BadgeGenerationRequest>,
) -> Result<Json<DrawList>, ApiError> {
    let req = with_active_layout(&state, req).await;
    let list = compose(&req).map_err(api_error)?;
    Ok(Json(list))
}

/// POST /api/badges/render - render a request to PDF without touching records.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BadgeGenerationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = with_active_layout(&state, req).await;
    let pdf = compose(&req)
        .and_then(|list| render_pdf(&list))
        .map_err(api_error)?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintBody {
    #[serde(default)]
    pub event_id: Option<String>,
    pub printed_by: String,
}

/// POST /api/badges/:kind/:id/print - print a record's badge.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<PrintBody>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PrintRequest {
        id,
        kind: parse_kind(&kind)?,
        event_id: body.event_id,
        printed_by: body.printed_by,
    };
    let fallback = state.active_layout.read().await.clone();
    let outcome = state
        .printer
        .print_badge(&request, &fallback)
        .await
        .map_err(api_error)?;

    Ok((
        [
            ("content-type", "application/pdf".to_string()),
            (BARCODE_HEADER, outcome.barcode),
            (STATUS_HEADER, outcome.status.as_str().to_string()),
        ],
        outcome.pdf,
    ))
}

#[derive(Debug, Serialize)]
pub struct BarcodeLookup {
    pub valid: bool,
    pub segments: Option<[String; 4]>,
}

/// GET /api/barcodes/:code - parse a lookup barcode.
pub async fn lookup(Path(code): Path<String>) -> Json<BarcodeLookup> {
    let parsed = parse_barcode(&code);
    Json(BarcodeLookup {
        valid: parsed.is_some(),
        segments: parsed.map(|p| p.segments),
    })
}
