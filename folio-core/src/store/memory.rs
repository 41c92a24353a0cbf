use async_trait::async_trait;
use folio_contracts::store::{DocumentStore, StoreResult};
use folio_model::{NewPortfolioRecord, PortfolioItem};
use std::sync::RwLock;
use tracing::debug;

use super::new_item_id;

/// Process-local store, mostly for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<PortfolioItem>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<PortfolioItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.clone())
    }

    async fn append(
        &self,
        record: NewPortfolioRecord,
    ) -> StoreResult<PortfolioItem> {
        let item = record.into_item(new_item_id());
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.push(item.clone());
        debug!(id = %item.id, total = items.len(), "appended portfolio item");
        Ok(item)
    }
}
