//! Periodic expiry sweep.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::usecase::SweepExpiredUseCase;

/// Spawn the perpetual sweep loop.
///
/// The first sweep runs immediately, then once per `interval`. The loop only
/// stops when the returned handle is aborted.
pub fn spawn_sweeper(usecase: Arc<SweepExpiredUseCase>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            "Sweeper started (interval: {:?}, ttl: {:?})",
            interval,
            usecase.ttl()
        );

        loop {
            ticker.tick().await;
            let evicted = usecase.execute().await;
            if evicted > 0 {
                tracing::info!("Sweep evicted {} claim(s)", evicted);
            }
        }
    })
}
