//! `DocumentStore` implementations.

#[cfg(feature = "firestore")]
pub mod firestore;
pub mod json_file;
pub mod memory;

#[cfg(feature = "firestore")]
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use folio_model::ItemId;
use uuid::Uuid;

/// Fresh document id for stores that assign their own.
pub(crate) fn new_item_id() -> ItemId {
    ItemId(Uuid::now_v7().simple().to_string())
}
