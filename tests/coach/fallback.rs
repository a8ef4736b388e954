use super::coach_harness::{FailingProvider, engine, free_user, memory_store};
use next_chapter_coach::coach::{ResponseCategory, ResponseSource, cached_responses};
use next_chapter_coach::safety::Tone;
use next_chapter_coach::usage::{Tier, UsagePeriod};

#[tokio::test]
async fn provider_failure_still_returns_a_reply() {
    let provider = FailingProvider::new();
    let engine = engine(provider.clone(), memory_store());

    let response = engine
        .send_message("Any tips for my interview tomorrow?", &free_user("u1"))
        .await
        .unwrap();

    assert_eq!(response.source, ResponseSource::Cached);
    assert!(!response.message.is_empty());
    assert_eq!(response.tokens_used, 0);
    assert!(!response.requires_professional_help);
    assert_eq!(provider.calls(), 1);
    assert_eq!(engine.get_token_usage("u1", UsagePeriod::Day).await.unwrap(), 0);
}

#[tokio::test]
async fn each_category_has_a_reachable_entry() {
    let engine = engine(FailingProvider::new(), memory_store());
    let user = free_user("u-cat").with_tier(Tier::Pro);

    let cases = [
        ("I got rejected from another role", ResponseCategory::Rejection),
        ("How should I prep for the interview?", ResponseCategory::Interview),
        ("I'm worried about money", ResponseCategory::Money),
        ("Who should I network with?", ResponseCategory::Networking),
        ("Can you look at my resume?", ResponseCategory::Resume),
        ("Where do I find motivation?", ResponseCategory::Motivation),
        ("Everything feels overwhelming", ResponseCategory::Overwhelm),
    ];

    for (text, category) in cases {
        let response = engine.send_message(text, &user).await.unwrap();
        let entry = cached_responses()
            .iter()
            .find(|entry| entry.response == response.message)
            .unwrap_or_else(|| panic!("{text:?} did not use a cached entry"));
        assert_eq!(entry.category, category, "{text:?}");
    }
}

#[tokio::test]
async fn unmatched_message_uses_generic_fallback_and_keeps_tone() {
    let engine = engine(FailingProvider::new(), memory_store());

    let response = engine
        .send_message("They screwed me and I have no idea what's next", &free_user("u1"))
        .await
        .unwrap();
    assert_eq!(response.tone, Tone::ToughLove);
    assert!(response.message.starts_with("Take it one step at a time"));
}

#[tokio::test]
async fn fallback_prefers_entries_matching_the_selected_tone() {
    let engine = engine(FailingProvider::new(), memory_store());

    // Discouraged selects hype; both rejection entries match.
    let response = engine
        .send_message("I feel hopeless, rejected again, pure rejection", &free_user("u1"))
        .await
        .unwrap();
    assert_eq!(response.tone, Tone::Hype);
    let entry = cached_responses()
        .iter()
        .find(|entry| entry.response == response.message)
        .unwrap();
    assert_eq!(entry.tone, Tone::Hype);
    assert_eq!(entry.category, ResponseCategory::Rejection);
}

#[test]
fn cached_table_is_exposed() {
    let engine = engine(FailingProvider::new(), memory_store());
    let table = engine.get_cached_responses();
    assert!(table.len() >= 7);
    assert!(table.iter().all(|entry| !entry.trigger.is_empty()));
}
