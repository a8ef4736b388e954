pub mod engine;
pub mod fallback;
pub mod prompts;
pub mod resume;
pub mod types;

pub use engine::{CoachEngine, CoachEngineBuilder, CompletionSettings};
pub use fallback::{
    CachedResponse, GENERIC_FALLBACK, ResponseCategory, cached_responses, select_cached_response,
};
pub use resume::parse_resume_analysis;
pub use types::{
    CoachResponse, KeywordMatch, PLAN_LENGTH_DAYS, ResponseSource, ResumeAnalysis,
    SectionFeedback, UserContext,
};
