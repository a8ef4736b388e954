use super::traits::{KvStore, StorageFuture, StorageResult};
use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    documents: HashMap<String, String>,
    counters: HashMap<String, i64>,
}

/// Process-local store. Every operation takes one lock, so `increment` is
/// atomic with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    tables: Mutex<Tables>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_tables(&self) -> StorageResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|error| StorageError::Backend(format!("Lock error: {error}")))
    }
}

impl KvStore for InMemoryKvStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move { Ok(self.lock_tables()?.documents.get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            self.lock_tables()?
                .documents
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let mut tables = self.lock_tables()?;
            let removed_document = tables.documents.remove(key).is_some();
            let removed_counter = tables.counters.remove(key).is_some();
            Ok(removed_document || removed_counter)
        })
    }

    fn increment<'a>(&'a self, key: &'a str, delta: i64) -> StorageFuture<'a, i64> {
        Box::pin(async move {
            let mut tables = self.lock_tables()?;
            let counter = tables.counters.entry(key.to_string()).or_insert(0);
            *counter = counter.saturating_add(delta);
            Ok(*counter)
        })
    }

    fn get_counter<'a>(&'a self, key: &'a str) -> StorageFuture<'a, i64> {
        Box::pin(async move { Ok(self.lock_tables()?.counters.get(key).copied().unwrap_or(0)) })
    }
}
