use super::types::{Clock, UsagePeriod, token_counter_key};
use crate::error::Result;
use crate::storage::KvStore;
use std::sync::Arc;

/// Per-user daily ledger of provider tokens spent on coach replies.
pub struct TokenLedger {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl TokenLedger {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn record(&self, user_id: &str, tokens: u64) -> Result<u64> {
        if tokens == 0 {
            return self.total(user_id, UsagePeriod::Day).await;
        }
        let delta = i64::try_from(tokens).unwrap_or(i64::MAX);
        let key = token_counter_key(user_id, self.clock.today());
        let total = self.store.increment(&key, delta).await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    pub async fn total(&self, user_id: &str, period: UsagePeriod) -> Result<u64> {
        let mut sum: u64 = 0;
        for date in period.dates_ending(self.clock.today()) {
            let value = self
                .store
                .get_counter(&token_counter_key(user_id, date))
                .await?;
            sum = sum.saturating_add(u64::try_from(value).unwrap_or_default());
        }
        Ok(sum)
    }
}
