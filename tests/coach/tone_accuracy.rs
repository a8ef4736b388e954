use super::coach_harness::{ScriptedProvider, engine, memory_store};
use next_chapter_coach::coach::UserContext;
use next_chapter_coach::safety::{EmotionalCategory, Tone};
use next_chapter_coach::usage::Tier;

const DISCOURAGED_CORPUS: [&str; 10] = [
    "I feel hopeless about this search",
    "Honestly I'm lost without a plan",
    "I feel worthless after that call",
    "Another failure, another week gone",
    "I'm completely burnt out",
    "I've been depressed since the layoff",
    "I'm giving up on tech jobs",
    "I can't do this anymore",
    "So burnt-out and hopeless",
    "I feel like a FAILURE",
];

const DEFLECTING_CORPUS: [&str; 10] = [
    "Recruiters are lazy",
    "They screwed me on the severance",
    "No one will hire me at my age",
    "This is rigged against people like me",
    "It's not fair that I was cut",
    "I blame my manager for this",
    "Everyone else got a referral",
    "It\u{2019}s not fair, they screwed me",
    "THIS IS RIGGED",
    "Honestly the hiring managers are lazy",
];

const NEUTRAL_CORPUS: [&str; 4] = [
    "What should I do next?",
    "Can you help me plan my week?",
    "How do I negotiate salary?",
    "I have a call with a recruiter on Friday",
];

const ACCURACY_BAR: f64 = 0.85;

async fn accuracy(corpus: &[&str], expected: Tone) -> f64 {
    let engine = engine(ScriptedProvider::new("Here's a next step.", 5, 5), memory_store());
    let user = UserContext::new("corpus-user").with_tier(Tier::Pro);

    let mut hits = 0_u32;
    for text in corpus {
        let response = engine.send_message(text, &user).await.unwrap();
        if response.tone == expected {
            hits += 1;
        }
    }
    f64::from(hits) / f64::from(u32::try_from(corpus.len()).unwrap())
}

#[tokio::test]
async fn discouraged_corpus_selects_hype() {
    let score = accuracy(&DISCOURAGED_CORPUS, Tone::Hype).await;
    assert!(score >= ACCURACY_BAR, "hype accuracy {score}");
}

#[tokio::test]
async fn deflecting_corpus_selects_tough_love() {
    let score = accuracy(&DEFLECTING_CORPUS, Tone::ToughLove).await;
    assert!(score >= ACCURACY_BAR, "tough-love accuracy {score}");
}

#[tokio::test]
async fn neutral_inputs_select_pragmatist() {
    let score = accuracy(&NEUTRAL_CORPUS, Tone::Pragmatist).await;
    assert!((score - 1.0).abs() < f64::EPSILON, "pragmatist accuracy {score}");
}

#[test]
fn matched_states_are_more_confident_than_neutral() {
    let engine = engine(ScriptedProvider::new("x", 0, 0), memory_store());
    let neutral = engine.detect_emotional_state("What should I do next?");
    assert_eq!(neutral.primary, EmotionalCategory::Neutral);
    assert!(!neutral.requires_support);
    assert!(neutral.triggers.is_empty());

    for text in DISCOURAGED_CORPUS.iter().chain(DEFLECTING_CORPUS.iter()) {
        let state = engine.detect_emotional_state(text);
        assert!(state.requires_support, "{text:?}");
        assert!(state.confidence >= 0.7, "{text:?}");
        assert!(state.confidence > neutral.confidence, "{text:?}");
        assert!(state.confidence <= 1.0, "{text:?}");
    }
}

#[test]
fn discouraged_takes_precedence_and_lists_all_triggers() {
    let engine = engine(ScriptedProvider::new("x", 0, 0), memory_store());
    let state = engine.detect_emotional_state("I'm hopeless and it's not fair, I'm a failure");
    assert_eq!(state.primary, EmotionalCategory::Discouraged);
    assert_eq!(state.triggers, vec!["hopeless", "failure"]);
    assert_eq!(engine.select_tone(&state), Tone::Hype);
}
