use super::types::{
    Clock, QuotaStatus, Tier, UNLIMITED_REMAINING, UsageCounter, UsagePeriod, clamp_count,
    message_counter_key, period_key,
};
use crate::config::QuotaConfig;
use crate::error::{CoachError, Result};
use crate::storage::KvStore;
use std::sync::Arc;

const ROLLBACK_ATTEMPTS: u32 = 2;

/// Per-user daily message cap for the free tier.
///
/// The counter is incremented before the limit is compared, and an
/// over-limit increment is rolled back. Concurrent callers therefore never
/// admit more than `limit` messages per day, at the cost of transiently
/// observing a count above the limit.
pub struct QuotaTracker {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    limit: u32,
    warning_threshold: u32,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, config: &QuotaConfig) -> Self {
        Self {
            store,
            clock,
            limit: config.free_daily_limit,
            warning_threshold: config.warning_threshold,
        }
    }

    /// Admit one message for `user_id`, returning the messages left today.
    pub async fn check_and_increment(&self, user_id: &str, tier: Tier) -> Result<u32> {
        let key = message_counter_key(user_id, self.clock.today());

        if tier == Tier::Pro {
            self.store.increment(&key, 1).await?;
            return Ok(UNLIMITED_REMAINING);
        }

        // Cheap pre-check so an exhausted user does not churn the counter.
        let current = clamp_count(self.store.get_counter(&key).await?);
        if current >= self.limit {
            tracing::info!(user_id, used = current, limit = self.limit, "Daily quota exhausted");
            return Err(CoachError::QuotaExceeded {
                used: current,
                limit: self.limit,
            });
        }

        let after = clamp_count(self.store.increment(&key, 1).await?);
        if after > self.limit {
            self.roll_back(user_id, &key).await;
            tracing::info!(user_id, limit = self.limit, "Daily quota exhausted under contention");
            return Err(CoachError::QuotaExceeded {
                used: self.limit,
                limit: self.limit,
            });
        }

        Ok(self.limit - after)
    }

    /// Undo an over-limit increment, retrying once. A counter left one too
    /// high costs the user a message until the date rolls over.
    async fn roll_back(&self, user_id: &str, key: &str) {
        for attempt in 1..=ROLLBACK_ATTEMPTS {
            match self.store.increment(key, -1).await {
                Ok(_) => return,
                Err(error) if attempt < ROLLBACK_ATTEMPTS => {
                    tracing::warn!(user_id, key, attempt, "Retrying over-limit rollback: {error}");
                }
                Err(error) => {
                    tracing::error!(
                        user_id,
                        key,
                        "Failed to roll back over-limit increment; counter stays one high: {error}"
                    );
                }
            }
        }
    }

    pub async fn message_count(&self, user_id: &str, period: UsagePeriod) -> Result<u32> {
        let mut total: u32 = 0;
        for date in period.dates_ending(self.clock.today()) {
            let count = self
                .store
                .get_counter(&message_counter_key(user_id, date))
                .await?;
            total = total.saturating_add(clamp_count(count));
        }
        Ok(total)
    }

    pub async fn remaining(&self, user_id: &str, tier: Tier) -> Result<u32> {
        if tier == Tier::Pro {
            return Ok(UNLIMITED_REMAINING);
        }
        let used = self.message_count(user_id, UsagePeriod::Day).await?;
        Ok(self.limit.saturating_sub(used))
    }

    pub async fn status(&self, user_id: &str, tier: Tier) -> Result<QuotaStatus> {
        let used = self.message_count(user_id, UsagePeriod::Day).await?;
        Ok(match tier {
            Tier::Pro => QuotaStatus {
                tier,
                used,
                limit: None,
                remaining: UNLIMITED_REMAINING,
                warning: false,
            },
            Tier::Free => {
                let remaining = self.limit.saturating_sub(used);
                QuotaStatus {
                    tier,
                    used,
                    limit: Some(self.limit),
                    remaining,
                    warning: remaining <= self.warning_threshold,
                }
            }
        })
    }

    pub async fn counter(&self, user_id: &str) -> Result<UsageCounter> {
        let today = self.clock.today();
        let count = self
            .store
            .get_counter(&message_counter_key(user_id, today))
            .await?;
        Ok(UsageCounter {
            user_id: user_id.to_string(),
            period_key: period_key(today),
            count: clamp_count(count),
        })
    }
}
