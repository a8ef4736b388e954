use super::coach_harness::{ScriptedProvider, engine, free_user, memory_store};
use next_chapter_coach::coach::ResponseSource;
use next_chapter_coach::safety::{CRISIS_MESSAGE, EmotionalCategory};
use next_chapter_coach::usage::UsagePeriod;

const CRISIS_PHRASES: [&str; 7] = [
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "better off dead",
    "harm myself",
    "self harm",
];

fn variants(phrase: &str) -> [String; 3] {
    [
        phrase.to_string(),
        format!("Lately I keep thinking about {phrase} and I don't know what to do"),
        phrase.to_uppercase(),
    ]
}

#[tokio::test]
async fn every_crisis_phrase_returns_hotline_envelope() {
    let provider = ScriptedProvider::new("should never be used", 10, 10);
    let store = memory_store();
    let engine = engine(provider.clone(), store);

    for (i, phrase) in CRISIS_PHRASES.iter().enumerate() {
        for (j, text) in variants(phrase).iter().enumerate() {
            let user = free_user(&format!("crisis-{i}-{j}"));
            let response = engine
                .send_message(text, &user)
                .await
                .unwrap_or_else(|e| panic!("{text:?} failed: {e}"));

            assert!(response.requires_professional_help, "{text:?}");
            assert!(response.message.contains("988"), "{text:?}");
            assert!(response.resources.len() >= 2, "{text:?}");
            assert_eq!(response.tokens_used, 0, "{text:?}");
            assert_eq!(response.source, ResponseSource::Crisis);
            assert_eq!(response.emotional_state.primary, EmotionalCategory::Crisis);
            assert_eq!(
                engine.get_token_usage(&user.user_id, UsagePeriod::Day).await.unwrap(),
                0
            );
        }
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn hyphenated_and_curly_forms_still_match() {
    let engine = engine(ScriptedProvider::new("unused", 1, 1), memory_store());

    for text in [
        "I've been thinking about self-harm",
        "Maybe everyone's better-off dead without me",
        "I\u{2019}m going to end   it all",
    ] {
        let response = engine.send_message(text, &free_user("u-hyphen")).await.unwrap();
        assert!(response.requires_professional_help, "{text:?}");
    }
}

#[test]
fn crisis_message_literals_are_stable() {
    assert!(CRISIS_MESSAGE.contains("988"));
    assert!(CRISIS_MESSAGE.contains("Text HOME to 741741"));
    assert!(CRISIS_MESSAGE.contains("988lifeline.org"));
}

#[tokio::test]
async fn crisis_resources_name_both_lines() {
    let engine = engine(ScriptedProvider::new("unused", 1, 1), memory_store());
    let response = engine
        .send_message("I want to kill myself", &free_user("u-res"))
        .await
        .unwrap();

    let contacts: Vec<_> = response.resources.iter().map(|r| r.contact.as_str()).collect();
    assert!(contacts.iter().any(|c| c.contains("988")));
    assert!(contacts.iter().any(|c| c.contains("741741")));
}

#[tokio::test]
async fn crisis_exchanges_are_not_persisted() {
    let engine = engine(ScriptedProvider::new("unused", 1, 1), memory_store());
    engine
        .send_message("thinking about suicide", &free_user("u-np"))
        .await
        .unwrap();
    assert!(engine.get_conversation_history("u-np").await.unwrap().is_empty());
}
