//! Document store contract: list every record, append a new one.

use async_trait::async_trait;
use folio_model::{NewPortfolioRecord, PortfolioItem};
use thiserror::Error;

/// Failures surfaced by a [`DocumentStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote store rejected request ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Remote collection of portfolio records.
///
/// `list_all` may legitimately return an empty list.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every record in the collection.
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>>;

    /// Persist a new record and return it with its assigned id.
    async fn append(
        &self,
        record: NewPortfolioRecord,
    ) -> StoreResult<PortfolioItem>;
}

#[async_trait]
impl<T> DocumentStore for std::sync::Arc<T>
where
    T: DocumentStore + ?Sized,
{
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>> {
        (**self).list_all().await
    }

    async fn append(
        &self,
        record: NewPortfolioRecord,
    ) -> StoreResult<PortfolioItem> {
        (**self).append(record).await
    }
}
