// src/scheduler.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::{
    sync::Notify,
    task::{JoinError, JoinHandle},
    time::MissedTickBehavior,
};

use crate::{
    services::rotation::{self, ExpiryPolicy},
    store::QuizStore,
};

/// Background task running the question rotation on a fixed interval.
///
/// Owned by the process: spawn it at start-up and `shutdown` it once the
/// server has stopped. A failing tick is logged and the next one runs on
/// schedule.
pub struct RotationScheduler {
    handle: JoinHandle<()>,
    stop: Arc<Notify>,
}

impl RotationScheduler {
    /// Starts ticking immediately, then every `interval`.
    pub fn spawn(store: Arc<dyn QuizStore>, interval: Duration, policy: ExpiryPolicy) -> Self {
        let stop = Arc::new(Notify::new());
        let stop_signal = stop.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_signal.notified() => break,
                    _ = ticker.tick() => {
                        match rotation::tick(store.as_ref(), Utc::now(), policy).await {
                            Ok(report) if report.expired > 0 || report.activated.is_some() => {
                                tracing::info!(
                                    expired = report.expired,
                                    activated = ?report.activated,
                                    "Question rotation applied"
                                );
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::warn!("Question rotation failed, retrying next interval: {}", e);
                            }
                        }
                    }
                }
            }

            tracing::info!("Question rotation stopped");
        });

        Self { handle, stop }
    }

    /// Signals the task to stop and waits for it to finish.
    /// A tick already in progress completes first.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.stop.notify_one();
        self.handle.await
    }
}
