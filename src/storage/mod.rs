pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;
pub use traits::{KvStore, StorageFuture, StorageResult};

use crate::config::{Config, StorageBackend};
use std::sync::Arc;

/// Build the configured storage backend.
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn KvStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!(backend = "memory", "Using in-memory coach storage");
            Ok(Arc::new(InMemoryKvStore::new()))
        }
        StorageBackend::Sqlite => {
            let path = config.database_path();
            tracing::info!(backend = "sqlite", path = %path.display(), "Opening coach storage");
            Ok(Arc::new(SqliteKvStore::open(&path).await?))
        }
    }
}
