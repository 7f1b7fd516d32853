//! Ephemeral artifact store
//!
//! Holds package bytes under generated identifiers. Two interchangeable
//! backends implement [`ArtifactStore`]; [`build_store`] picks one from
//! configuration once at startup.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::StoreConfig;
use crate::error::{Result, XlfillError};

/// Thread-safe keyed byte store.
///
/// A successful `put` is visible to every subsequent `get`, from any thread.
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under a fresh identifier and return it.
    ///
    /// # Errors
    /// Fails when the backend cannot persist the bytes.
    fn put(&self, bytes: Vec<u8>) -> Result<String>;

    /// Bytes stored under `id`.
    ///
    /// # Errors
    /// [`XlfillError::ArtifactNotFound`] when `id` is unknown or was evicted.
    fn get(&self, id: &str) -> Result<Vec<u8>>;

    /// Drop `id` from the store.
    ///
    /// # Errors
    /// [`XlfillError::ArtifactNotFound`] when `id` is unknown.
    fn remove(&self, id: &str) -> Result<()>;

    /// Number of stored artifacts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn ArtifactStore>;

/// Build the backend described by `config`, tagging ids with `prefix`.
///
/// # Errors
/// Fails when a filesystem store's directory cannot be created.
pub fn build_store(config: &StoreConfig, prefix: &str) -> Result<SharedStore> {
    Ok(match config {
        StoreConfig::Memory { capacity } => Arc::new(MemoryStore::new(prefix, *capacity)),
        StoreConfig::Filesystem { dir } => Arc::new(FsStore::new(dir, prefix)?),
    })
}

/// Fresh identifier: `<prefix>-<unix millis>-<random>`.
pub fn generate_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{millis}-{suffix}")
}

/// Whether `id` could have been produced by [`generate_id`].
///
/// Rejects anything that could escape a directory when used as a file name.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub(crate) fn not_found(id: &str) -> XlfillError {
    XlfillError::ArtifactNotFound(id.to_string())
}
