use crate::service::ResolutionService;
use std::sync::Arc;
use std::time::Duration;
use tether_core::{Clock, Persistence};
use tether_generator::Generator;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Runs [`ResolutionService::sweep_expired`] every `period` until the
/// returned handle is aborted.
///
/// The first sweep happens one full period after spawning. A failed sweep is
/// logged and retried on the next tick.
pub fn spawn_sweeper<P, G, C>(
    service: Arc<ResolutionService<P, G, C>>,
    period: Duration,
) -> JoinHandle<()>
where
    P: Persistence,
    G: Generator,
    C: Clock,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match service.sweep_expired().await {
                Ok(0) => {}
                Ok(swept) => debug!(swept, "expiration sweep finished"),
                Err(err) => warn!(error = %err, "expiration sweep failed"),
            }
        }
    })
}
