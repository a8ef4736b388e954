use super::coach_harness::{ScriptedProvider, engine, free_user, memory_store};
use next_chapter_coach::conversation::MessageRole;
use next_chapter_coach::safety::{CARD_REPLACEMENT, SSN_REPLACEMENT, redact};

const SAMPLES: [&str; 8] = [
    "my ssn is 123-45-6789",
    "card 4111 1111 1111 1111 exp 09/27",
    "card 4111-1111-1111-1111 and ssn 123 45 6789",
    "ids 123456789 and 5500000000000004",
    "nothing sensitive here",
    "call me at 555-1234 on day 12",
    "[SSN REMOVED] already",
    "",
];

#[test]
fn redaction_is_idempotent() {
    for sample in SAMPLES {
        let once = redact(sample).into_owned();
        let twice = redact(&once).into_owned();
        assert_eq!(once, twice, "{sample:?}");
    }
}

#[test]
fn redaction_replaces_expected_shapes() {
    assert_eq!(redact("ssn 123-45-6789"), format!("ssn {SSN_REPLACEMENT}"));
    assert_eq!(
        redact("card 4111111111111111"),
        format!("card {CARD_REPLACEMENT}")
    );
    assert_eq!(redact("nothing to see on day 12"), "nothing to see on day 12");
    assert_eq!(
        redact("ssn 123-45-6789 4567 thanks"),
        format!("ssn {SSN_REPLACEMENT} 4567 thanks")
    );
}

#[tokio::test]
async fn stored_history_never_holds_raw_pii() {
    let provider = ScriptedProvider::new("Got it. I see 123-45-6789 in your note.", 10, 5);
    let engine = engine(provider, memory_store());

    let response = engine
        .send_message(
            "I'm lost. My SSN 123-45-6789 and card 4111 1111 1111 1111 were in the leak",
            &free_user("u1"),
        )
        .await
        .unwrap();
    assert!(!response.message.contains("123-45-6789"));
    assert!(response.message.contains(SSN_REPLACEMENT));

    let history = engine.get_conversation_history("u1").await.unwrap();
    let record = &history[0];
    let user_message = &record.messages[0];
    assert_eq!(user_message.role, MessageRole::User);
    assert!(user_message.text.contains(SSN_REPLACEMENT));
    assert!(user_message.text.contains(CARD_REPLACEMENT));

    let serialized = serde_json::to_string(record).unwrap();
    assert!(!serialized.contains("123-45-6789"));
    assert!(!serialized.contains("4111 1111 1111 1111"));
}

#[tokio::test]
async fn classification_runs_on_raw_text() {
    let engine = engine(ScriptedProvider::new("ok", 1, 1), memory_store());
    let response = engine
        .send_message("Feeling worthless 123-45-6789", &free_user("u1"))
        .await
        .unwrap();
    assert_eq!(response.emotional_state.triggers, vec!["worthless"]);
}
