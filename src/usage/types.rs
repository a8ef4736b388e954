use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Remaining-message sentinel reported for unlimited (pro) users.
pub const UNLIMITED_REMAINING: u32 = u32::MAX;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

/// Window over which daily counters are summed. Windows end today and are
/// measured in calendar days.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UsagePeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl UsagePeriod {
    pub fn days(self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Every calendar day in the window, newest first.
    pub fn dates_ending(self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.days())
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .collect()
    }
}

/// Period key for a calendar day (`YYYY-MM-DD`).
pub fn period_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn message_counter_key(user_id: &str, date: NaiveDate) -> String {
    format!("coach/usage/{user_id}/{}", period_key(date))
}

pub fn token_counter_key(user_id: &str, date: NaiveDate) -> String {
    format!("coach/tokens/{user_id}/{}", period_key(date))
}

/// Snapshot of one user's daily message counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounter {
    pub user_id: String,
    pub period_key: String,
    pub count: u32,
}

/// Quota view for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub tier: Tier,
    pub used: u32,
    /// `None` for unlimited tiers.
    pub limit: Option<u32>,
    pub remaining: u32,
    /// True when a free user is at or below the warning threshold.
    pub warning: bool,
}

/// Source of "today" for period keys.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Server-local calendar date; counters roll over at local midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub(crate) fn clamp_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}
