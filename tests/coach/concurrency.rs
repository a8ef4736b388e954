use std::sync::Arc;

use super::coach_harness::{ScriptedProvider, engine, free_user, memory_store};
use next_chapter_coach::coach::CoachEngine;
use next_chapter_coach::error::CoachError;
use next_chapter_coach::storage::{KvStore, SqliteKvStore};
use next_chapter_coach::usage::{Tier, UsagePeriod};

const CONCURRENT_SENDS: usize = 25;
const FREE_LIMIT: usize = 10;

async fn race(engine: Arc<CoachEngine>) -> (usize, usize) {
    let mut handles = Vec::with_capacity(CONCURRENT_SENDS);
    for i in 0..CONCURRENT_SENDS {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .send_message(&format!("question {i}"), &free_user("racer"))
                .await
        }));
    }

    let (mut admitted, mut rejected) = (0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(CoachError::QuotaExceeded { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    (admitted, rejected)
}

async fn stored_messages(engine: &CoachEngine) -> usize {
    let history = engine.get_conversation_history("racer").await.unwrap();
    assert_eq!(history.len(), 1);
    history[0].messages.len()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_respect_limit_and_keep_history() {
    let engine = Arc::new(engine(ScriptedProvider::new("ok", 1, 1), memory_store()));

    let (admitted, rejected) = race(Arc::clone(&engine)).await;

    assert_eq!(admitted, FREE_LIMIT);
    assert_eq!(rejected, CONCURRENT_SENDS - FREE_LIMIT);
    assert_eq!(
        engine.get_message_count("racer", UsagePeriod::Day).await.unwrap(),
        10
    );
    assert_eq!(engine.get_remaining_messages("racer", Tier::Free).await.unwrap(), 0);
    assert_eq!(stored_messages(&engine).await, admitted * 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_on_sqlite_respect_limit_and_keep_history() {
    let tmp = tempfile::tempdir().unwrap();
    let store: Arc<dyn KvStore> =
        Arc::new(SqliteKvStore::open(&tmp.path().join("coach.db")).await.unwrap());
    let engine = Arc::new(engine(ScriptedProvider::new("ok", 1, 1), store));

    let (admitted, rejected) = race(Arc::clone(&engine)).await;

    assert_eq!(admitted, FREE_LIMIT);
    assert_eq!(rejected, CONCURRENT_SENDS - FREE_LIMIT);
    assert_eq!(
        engine.get_message_count("racer", UsagePeriod::Day).await.unwrap(),
        10
    );
    assert_eq!(stored_messages(&engine).await, admitted * 2);
}
