//! Storage seam for the print flow.
//!
//! The print flow needs exactly three things from storage: the record,
//! the event's saved layout, and a place to write the print marker.
//! [`MemoryRepository`] is the in-process implementation backing the
//! server and tests.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use super::record::{BadgeRecord, RecordKind};
use crate::error::LanyardError;
use crate::fields::ValueMap;
use crate::layout::BadgeLayoutConfig;

#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// Current state of one record, including any stored badge id.
    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<BadgeRecord, LanyardError>;

    /// The event's saved layout, `None` if it never saved one.
    async fn get_event_layout(
        &self,
        event_id: &str,
    ) -> Result<Option<BadgeLayoutConfig>, LanyardError>;

    /// Record that `badge_id` was printed for the record by `printed_by`, now.
    async fn persist_print_marker(
        &self,
        kind: RecordKind,
        record_id: &str,
        printed_by: &str,
        badge_id: &str,
    ) -> Result<(), LanyardError>;
}

/// Initial contents for a [`MemoryRepository`], loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySeed {
    #[serde(default)]
    pub records: Vec<BadgeRecord>,
    /// Event id → saved layout.
    #[serde(default)]
    pub layouts: HashMap<String, BadgeLayoutConfig>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: RwLock<HashMap<(RecordKind, String), BadgeRecord>>,
    layouts: RwLock<HashMap<String, BadgeLayoutConfig>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: RepositorySeed) -> Self {
        let records = seed
            .records
            .into_iter()
            .map(|r| ((r.kind, r.id.clone()), r))
            .collect();
        Self {
            records: RwLock::new(records),
            layouts: RwLock::new(seed.layouts),
        }
    }

    /// Insert or replace a record.
    pub async fn upsert_record(&self, record: BadgeRecord) {
        let mut records = self.records.write().await;
        records.insert((record.kind, record.id.clone()), record);
    }

    /// Replace a record's values, creating the record if it is new.
    ///
    /// The badge id and print marker of an existing record are kept. The
    /// change happens under one write lock so a concurrent
    /// `persist_print_marker` is never overwritten.
    pub async fn set_values(
        &self,
        kind: RecordKind,
        id: impl Into<String>,
        values: ValueMap,
    ) -> BadgeRecord {
        let id = id.into();
        let mut records = self.records.write().await;
        match records.entry((kind, id.clone())) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().values = values;
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(BadgeRecord::new(kind, id, values)).clone(),
        }
    }

    pub async fn put_event_layout(&self, event_id: impl Into<String>, layout: BadgeLayoutConfig) {
        let mut layouts = self.layouts.write().await;
        layouts.insert(event_id.into(), layout);
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl BadgeRepository for MemoryRepository {
    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<BadgeRecord, LanyardError> {
        let records = self.records.read().await;
        records
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or_else(|| LanyardError::RecordNotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            })
    }

    async fn get_event_layout(
        &self,
        event_id: &str,
    ) -> Result<Option<BadgeLayoutConfig>, LanyardError> {
        Ok(self.layouts.read().await.get(event_id).cloned())
    }

    async fn persist_print_marker(
        &self,
        kind: RecordKind,
        record_id: &str,
        printed_by: &str,
        badge_id: &str,
    ) -> Result<(), LanyardError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&(kind, record_id.to_string()))
            .ok_or_else(|| LanyardError::RecordNotFound {
                kind: kind.to_string(),
                id: record_id.to_string(),
            })?;
        record.badge_id = Some(badge_id.to_string());
        record.badge_printed_at = Some(Utc::now());
        record.badge_printed_by = Some(printed_by.to_string());
        Ok(())
    }
}
