use super::types::{EmotionalCategory, EmotionalState, Tone};

/// Map an emotional reading to the coach persona.
pub fn select_tone(state: &EmotionalState) -> Tone {
    match state.primary {
        EmotionalCategory::Discouraged => Tone::Hype,
        EmotionalCategory::Deflecting => Tone::ToughLove,
        EmotionalCategory::Neutral | EmotionalCategory::Crisis => Tone::Pragmatist,
    }
}
