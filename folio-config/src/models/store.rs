use folio_contracts::store::{DocumentStore, StoreError};
use folio_core::store::{FirestoreConfig, FirestoreStore, InMemoryStore, JsonFileStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

fn default_json_path() -> PathBuf {
    PathBuf::from("portfolio.json")
}

/// Which `DocumentStore` backs the portfolio collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    Memory,
    Json {
        #[serde(default = "default_json_path")]
        path: PathBuf,
    },
    Firestore(FirestoreConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: default_json_path(),
        }
    }
}

impl StoreConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Json { .. } => "json",
            StoreConfig::Firestore(_) => "firestore",
        }
    }

    pub fn open(&self) -> Result<Arc<dyn DocumentStore>, StoreError> {
        Ok(match self {
            StoreConfig::Memory => Arc::new(InMemoryStore::new()),
            StoreConfig::Json { path } => Arc::new(JsonFileStore::new(path)),
            StoreConfig::Firestore(cfg) => Arc::new(FirestoreStore::new(cfg.clone())?),
        })
    }
}
