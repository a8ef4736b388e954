#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use next_chapter_coach::coach::{CoachEngine, UserContext};
use next_chapter_coach::error::StorageError;
use next_chapter_coach::llm::{
    ChatProvider, CompletionFuture, CompletionRequest, CompletionResponse,
};
use next_chapter_coach::storage::{InMemoryKvStore, KvStore, StorageFuture};
use next_chapter_coach::usage::{FixedClock, message_counter_key};

pub const TODAY: (i32, u32, u32) = (2026, 5, 14);

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).expect("valid fixture date")
}

/// Provider that always answers with the same completion.
pub struct ScriptedProvider {
    reply: String,
    input_tokens: u64,
    output_tokens: u64,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(reply: &str, input_tokens: u64, output_tokens: u64) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            input_tokens,
            output_tokens,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so concurrent callers actually interleave.
            tokio::task::yield_now().await;
            Ok(CompletionResponse::with_usage(
                self.reply.clone(),
                self.input_tokens,
                self.output_tokens,
            ))
        })
    }
}

/// Provider whose every call fails.
#[derive(Default)]
pub struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChatProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("upstream returned 503 Service Unavailable")
        })
    }
}

/// Store whose document writes fail while counters keep working.
pub struct ReadOnlyDocumentStore {
    inner: InMemoryKvStore,
}

impl ReadOnlyDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryKvStore::new(),
        })
    }
}

impl KvStore for ReadOnlyDocumentStore {
    fn name(&self) -> &str {
        "read-only-documents"
    }

    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        self.inner.get(key)
    }

    fn set<'a>(&'a self, _key: &'a str, _value: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async { Err(StorageError::Backend("disk full".into())) })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, bool> {
        self.inner.remove(key)
    }

    fn increment<'a>(&'a self, key: &'a str, delta: i64) -> StorageFuture<'a, i64> {
        self.inner.increment(key, delta)
    }

    fn get_counter<'a>(&'a self, key: &'a str) -> StorageFuture<'a, i64> {
        self.inner.get_counter(key)
    }
}

/// Store that is entirely unavailable.
pub struct UnavailableStore;

impl KvStore for UnavailableStore {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn get<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async { Err(StorageError::Backend("connection refused".into())) })
    }

    fn set<'a>(&'a self, _key: &'a str, _value: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async { Err(StorageError::Backend("connection refused".into())) })
    }

    fn remove<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, bool> {
        Box::pin(async { Err(StorageError::Backend("connection refused".into())) })
    }

    fn increment<'a>(&'a self, _key: &'a str, _delta: i64) -> StorageFuture<'a, i64> {
        Box::pin(async { Err(StorageError::Backend("connection refused".into())) })
    }

    fn get_counter<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, i64> {
        Box::pin(async { Err(StorageError::Backend("connection refused".into())) })
    }
}

pub fn memory_store() -> Arc<dyn KvStore> {
    Arc::new(InMemoryKvStore::new())
}

pub fn engine(provider: Arc<dyn ChatProvider>, store: Arc<dyn KvStore>) -> CoachEngine {
    CoachEngine::builder(provider, store)
        .clock(Arc::new(FixedClock(today())))
        .build()
}

pub fn free_user(user_id: &str) -> UserContext {
    UserContext::new(user_id)
        .with_display_name("Jordan")
        .with_days_since_layoff(9)
        .with_plan_day(4)
}

/// Pretend `count` messages were already sent today.
pub async fn seed_message_count(store: &Arc<dyn KvStore>, user_id: &str, count: i64) {
    store
        .increment(&message_counter_key(user_id, today()), count)
        .await
        .expect("seed counter");
}
