use std::sync::Arc;

use super::coach_harness::{
    FailingProvider, ScriptedProvider, UnavailableStore, engine, free_user, memory_store,
    seed_message_count, today,
};
use next_chapter_coach::coach::CoachEngine;
use next_chapter_coach::error::CoachError;
use next_chapter_coach::usage::{FixedClock, Tier, UNLIMITED_REMAINING, UsagePeriod};

#[tokio::test]
async fn exhausted_free_user_is_blocked_even_in_crisis() {
    let store = memory_store();
    seed_message_count(&store, "u1", 10).await;
    let provider = ScriptedProvider::new("unused", 1, 1);
    let engine = engine(provider.clone(), store);

    for text in ["What should I do next?", "I want to end it all"] {
        let err = engine.send_message(text, &free_user("u1")).await.unwrap_err();
        assert!(
            matches!(err, CoachError::QuotaExceeded { used: 10, limit: 10 }),
            "{err:?}"
        );
        assert_eq!(err.code(), "QUOTA_EXCEEDED");
        assert!(err.to_string().starts_with("Daily message limit reached."));
        assert!(!err.is_retryable());
    }

    assert_eq!(provider.calls(), 0);
    assert_eq!(engine.get_message_count("u1", UsagePeriod::Day).await.unwrap(), 10);
}

#[tokio::test]
async fn remaining_reflects_todays_count() {
    let store = memory_store();
    seed_message_count(&store, "u1", 7).await;
    let engine = engine(ScriptedProvider::new("ok", 1, 1), store);

    assert_eq!(engine.get_remaining_messages("u1", Tier::Free).await.unwrap(), 3);

    let status = engine.get_quota_status("u1", Tier::Free).await.unwrap();
    assert_eq!(status.used, 7);
    assert_eq!(status.limit, Some(10));
    assert_eq!(status.remaining, 3);
    assert!(status.warning);
}

#[tokio::test]
async fn pro_users_report_sentinel_regardless_of_count() {
    let store = memory_store();
    seed_message_count(&store, "pro", 250).await;
    let engine = engine(ScriptedProvider::new("ok", 1, 1), store);

    assert_eq!(
        engine.get_remaining_messages("pro", Tier::Pro).await.unwrap(),
        UNLIMITED_REMAINING
    );
    let context = free_user("pro").with_tier(Tier::Pro);
    assert!(engine.send_message("What next?", &context).await.is_ok());
    assert_eq!(engine.get_message_count("pro", UsagePeriod::Day).await.unwrap(), 251);

    let status = engine.get_quota_status("pro", Tier::Pro).await.unwrap();
    assert_eq!(status.limit, None);
    assert!(!status.warning);
}

#[tokio::test]
async fn eleventh_message_of_the_day_is_rejected() {
    let engine = engine(FailingProvider::new(), memory_store());
    let user = free_user("u1");

    for i in 0..10 {
        engine
            .send_message(&format!("question {i}"), &user)
            .await
            .unwrap_or_else(|e| panic!("message {i} rejected: {e}"));
    }
    let err = engine.send_message("one more", &user).await.unwrap_err();
    assert_eq!(err.code(), "QUOTA_EXCEEDED");
    assert_eq!(engine.get_remaining_messages("u1", Tier::Free).await.unwrap(), 0);
}

#[tokio::test]
async fn counter_rolls_over_with_the_date() {
    let store = memory_store();
    seed_message_count(&store, "u1", 10).await;

    let tomorrow = today().succ_opt().unwrap();
    let next_day = CoachEngine::builder(ScriptedProvider::new("ok", 1, 1), Arc::clone(&store))
        .clock(Arc::new(FixedClock(tomorrow)))
        .build();

    assert_eq!(next_day.get_remaining_messages("u1", Tier::Free).await.unwrap(), 10);
    assert!(next_day.send_message("Fresh start", &free_user("u1")).await.is_ok());
    assert_eq!(next_day.get_message_count("u1", UsagePeriod::Day).await.unwrap(), 1);
    assert_eq!(next_day.get_message_count("u1", UsagePeriod::Week).await.unwrap(), 11);
}

#[tokio::test]
async fn storage_outage_fails_closed() {
    let provider = ScriptedProvider::new("unused", 1, 1);
    let engine = engine(provider.clone(), Arc::new(UnavailableStore));

    let err = engine
        .send_message("I want to end it all", &free_user("u1"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "STORAGE_ERROR");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn configured_limit_is_honored() {
    let engine = CoachEngine::builder(ScriptedProvider::new("ok", 1, 1), memory_store())
        .clock(Arc::new(FixedClock(today())))
        .free_daily_limit(2)
        .build();
    let user = free_user("u1");

    assert!(engine.send_message("one", &user).await.is_ok());
    assert!(engine.send_message("two", &user).await.is_ok());
    assert!(matches!(
        engine.send_message("three", &user).await,
        Err(CoachError::QuotaExceeded { limit: 2, .. })
    ));
}
