use crate::error::StorageError;
use std::future::Future;
use std::pin::Pin;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = StorageResult<T>> + Send + 'a>>;

/// Async key-value persistence contract.
///
/// Documents are opaque strings (the coach stores JSON). Counters live in a
/// separate integer namespace so they can be incremented atomically.
pub trait KvStore: Send + Sync {
    /// Backend identifier for logs (e.g. "sqlite", "memory").
    fn name(&self) -> &str;

    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>>;

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()>;

    /// Remove a document and any counter stored under `key`. Returns whether
    /// anything was deleted.
    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, bool>;

    /// Atomically add `delta` to the counter at `key` (created at 0) and
    /// return the new value.
    fn increment<'a>(&'a self, key: &'a str, delta: i64) -> StorageFuture<'a, i64>;

    /// Current counter value, 0 when absent.
    fn get_counter<'a>(&'a self, key: &'a str) -> StorageFuture<'a, i64>;
}
