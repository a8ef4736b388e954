pub mod quota;
pub mod tokens;
pub mod types;

pub use quota::QuotaTracker;
pub use tokens::TokenLedger;
pub use types::{
    Clock, FixedClock, QuotaStatus, SystemClock, Tier, UNLIMITED_REMAINING, UsageCounter,
    UsagePeriod, message_counter_key, period_key, token_counter_key,
};
