//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::LanyardError;
use crate::layout::{BadgeLayoutConfig, FileStore, KeyValueStore, load_layout_config_or_default};
use crate::print::{MemoryRepository, PrintService, RepositorySeed};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory backing the layout store
    pub data_dir: PathBuf,
    /// Optional JSON file of records and event layouts to preload
    pub records_path: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    /// Layout used when a print has no event layout. Survives failed saves.
    pub active_layout: RwLock<BadgeLayoutConfig>,
    pub records: Arc<MemoryRepository>,
    pub printer: PrintService,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self, LanyardError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));

        let seed = match &config.records_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str::<RepositorySeed>(&raw)?
            }
            None => RepositorySeed::default(),
        };
        tracing::info!(
            records = seed.records.len(),
            event_layouts = seed.layouts.len(),
            "loaded record seed"
        );

        Ok(Self::with_parts(store, Arc::new(MemoryRepository::from_seed(seed))))
    }

    /// Assemble state from an existing store and repository.
    pub fn with_parts(store: Arc<dyn KeyValueStore>, records: Arc<MemoryRepository>) -> Self {
        let active_layout = load_layout_config_or_default(store.as_ref());
        let printer = PrintService::new(records.clone());
        Self {
            store,
            active_layout: RwLock::new(active_layout),
            records,
            printer,
        }
    }
}
