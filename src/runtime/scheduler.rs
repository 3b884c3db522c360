//! Wall-clock timer scheduling on the tokio runtime

use super::traits::{Scheduler, TimerRequest};
use super::RuntimeEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Spawns one task per timer, each raced against its own token
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        request: TimerRequest,
        tx: mpsc::Sender<RuntimeEvent>,
    ) -> CancellationToken {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let event = request.event();

        tokio::spawn(async move {
            if request.repeat {
                // A zero period would make the interval panic
                let period = request.delay.max(Duration::from_millis(1));
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            if tx.send(event.clone()).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            } else {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(request.delay) => {
                        let _ = tx.send(event).await;
                    }
                }
            }
            tracing::trace!(timer = ?request.timer, "Timer task finished");
        });

        token
    }
}
