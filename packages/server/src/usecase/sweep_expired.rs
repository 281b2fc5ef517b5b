//! UseCase: 期限切れの確保の削除
//!
//! 1 回のスイープで削除された確保がいくつあっても、ブロードキャストは
//! 最大 1 回です。

use std::{sync::Arc, time::Duration};

use tomoshibi_shared::time::{Clock, timestamp_to_jst_rfc3339};

use crate::domain::{MessagePusher, SlotRepository, Timestamp};

/// Default time-to-live of a claim (8 hours)
pub const DEFAULT_CLAIM_TTL: Duration = Duration::from_secs(60 * 60 * 8);

/// 期限切れ削除のユースケース
pub struct SweepExpiredUseCase {
    repository: Arc<dyn SlotRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SweepExpiredUseCase {
    pub fn new(
        repository: Arc<dyn SlotRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 1 回のスイープを実行し、削除した確保の数を返す
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = self.repository.sweep_expired(now, self.ttl).await;

        for evicted in &outcome.evicted {
            tracing::info!(
                "Unlighting old candle {} ('{}' by {}, lit at {})",
                evicted.index,
                evicted.claim.payload.as_str(),
                evicted.claim.owner,
                timestamp_to_jst_rfc3339(evicted.claim.claimed_at.value())
            );
        }

        if !outcome.evicted.is_empty() {
            self.message_pusher.broadcast(&outcome.snapshot).await;
        }

        outcome.evicted.len()
    }
}
