pub mod classifier;
pub mod crisis;
pub mod keywords;
pub mod redact;
pub mod tone;
pub mod types;

pub use classifier::EmotionalClassifier;
pub use crisis::{CRISIS_MESSAGE, CrisisDetector, CrisisResource, crisis_resources};
pub use keywords::{KeywordTable, normalize};
pub use redact::{CARD_REPLACEMENT, SSN_REPLACEMENT, redact};
pub use tone::select_tone;
pub use types::{EmotionalCategory, EmotionalState, Tone};
