//! # Badge Printing
//!
//! The one externally-invoked operation: print a badge for a record.
//!
//! ```text
//! fetch record ──► fetch event layout ──► compose ──► render ──► persist marker
//!                  (best effort)
//! ```
//!
//! Steps run strictly in sequence. A compose or render failure aborts before
//! the marker is written, so the record is never marked printed for a badge
//! that was not produced. A failed marker write is reported as a failure
//! even though the PDF exists.
//!
//! Barcodes are generated only on a record's first print; afterwards the
//! stored badge id is reused verbatim. Two concurrent first prints of the
//! same record can each generate a code (nothing claims the id atomically);
//! the later marker write wins.

mod record;
mod repository;

pub use record::{BadgeRecord, RecordKind};
pub use repository::{BadgeRepository, MemoryRepository, RepositorySeed};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::barcode::{
    PARTICIPANT_CODE_LEN, STAFF_BADGE_ID_MAX_LEN, generate_barcode, generate_identifier_code,
    truncate_code,
};
use crate::compose::{BadgeGenerationRequest, compose};
use crate::error::LanyardError;
use crate::layout::BadgeLayoutConfig;
use crate::render::render_pdf;

/// New badge code for a record printed for the first time.
///
/// - staff: `STAFF-<id[..8]>-<millis>`, cut to 20 characters
/// - participant: 12 digits derived from `PART-<id[..8]>-<millis>`
pub fn generate_badge_code(kind: RecordKind, record_id: &str, timestamp_millis: i64) -> String {
    match kind {
        RecordKind::Staff => truncate_code(
            &generate_identifier_code("STAFF", record_id, timestamp_millis),
            STAFF_BADGE_ID_MAX_LEN,
        ),
        _ => generate_barcode(
            &generate_identifier_code("PART", record_id, timestamp_millis),
            PARTICIPANT_CODE_LEN,
        ),
    }
}

/// Caller input for one print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default)]
    pub event_id: Option<String>,
    pub printed_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    /// First print; a new badge code was generated.
    Printed,
    /// The stored badge code was reused.
    Reprinted,
}

impl PrintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PrintStatus::Printed => "printed",
            PrintStatus::Reprinted => "reprinted",
        }
    }
}

/// Result of a successful print.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOutcome {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub id: String,
    pub barcode: String,
    pub status: PrintStatus,
    /// The badge document.
    #[serde(skip)]
    pub pdf: Vec<u8>,
}

/// Runs the print flow against a repository.
#[derive(Clone)]
pub struct PrintService {
    repo: Arc<dyn BadgeRepository>,
}

impl PrintService {
    pub fn new(repo: Arc<dyn BadgeRepository>) -> Self {
        Self { repo }
    }

    /// Print a badge.
    ///
    /// `fallback_layout` is used when no event is given, when the event has
    /// no saved layout, or when fetching it fails (logged, not raised).
    pub async fn print_badge(
        &self,
        request: &PrintRequest,
        fallback_layout: &BadgeLayoutConfig,
    ) -> Result<PrintOutcome, LanyardError> {
        if !request.kind.is_printable() {
            return Err(LanyardError::InvalidBadgeRequest(format!(
                "{} records do not have badges",
                request.kind
            )));
        }

        let record = self.repo.get_record(request.kind, &request.id).await?;
        let layout = self
            .event_layout(request.event_id.as_deref())
            .await
            .unwrap_or_else(|| fallback_layout.clone());

        let (barcode, status) = match record.existing_badge_id() {
            Some(existing) => (existing.to_string(), PrintStatus::Reprinted),
            None => (
                generate_badge_code(
                    record.kind,
                    &record.id,
                    chrono::Utc::now().timestamp_millis(),
                ),
                PrintStatus::Printed,
            ),
        };

        let badge = BadgeGenerationRequest {
            record_id: record.id.clone(),
            name: record.display_name(),
            role: record.role(),
            barcode: barcode.clone(),
            values: record.values.clone(),
            layout: Some(layout),
        };
        let pdf = render_pdf(&compose(&badge)?)?;

        self.repo
            .persist_print_marker(record.kind, &record.id, &request.printed_by, &barcode)
            .await?;

        tracing::info!(
            record_id = %record.id,
            kind = %record.kind,
            barcode = %barcode,
            status = status.as_str(),
            "badge printed"
        );

        Ok(PrintOutcome {
            kind: record.kind,
            id: record.id,
            barcode,
            status,
            pdf,
        })
    }

    async fn event_layout(&self, event_id: Option<&str>) -> Option<BadgeLayoutConfig> {
        let event_id = event_id?;
        match self.repo.get_event_layout(event_id).await {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(event_id, error = %e, "event layout unavailable, using fallback");
                None
            }
        }
    }
}
