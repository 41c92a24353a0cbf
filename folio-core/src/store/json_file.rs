//! Store backed by a JSON array on disk.

use async_trait::async_trait;
use folio_contracts::store::{DocumentStore, StoreError, StoreResult};
use folio_model::{NewPortfolioRecord, PortfolioItem};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::new_item_id;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles from this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_items(&self) -> StoreResult<Vec<PortfolioItem>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&raw).map_err(|err| {
            StoreError::Serialization(format!(
                "{}: {err}",
                self.path.display()
            ))
        })
    }

    async fn write_items(&self, items: &[PortfolioItem]) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(items)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>> {
        self.read_items().await
    }

    async fn append(
        &self,
        record: NewPortfolioRecord,
    ) -> StoreResult<PortfolioItem> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_items().await?;
        let item = record.into_item(new_item_id());
        items.push(item.clone());
        self.write_items(&items).await?;
        info!(id = %item.id, path = %self.path.display(), "portfolio item saved");
        Ok(item)
    }
}
