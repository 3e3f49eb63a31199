//! Seams to the collaborators that own persistence and file picking.

pub mod document;
pub mod error;
pub mod file;
pub mod memory;

pub use document::{DocumentSource, PathSource, PickedDocument};
pub use error::{DocumentError, StorageError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Async string store addressed by key.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
