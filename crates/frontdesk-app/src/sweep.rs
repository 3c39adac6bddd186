//! Background timeout sweep.
//!
//! Periodically asks the help request engine to transition pending
//! requests past their deadline. The sweep is idempotent and safe to run
//! concurrently with live creation/resolution, so the loop needs no
//! coordination beyond a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{info, warn};

use frontdesk_escalation::HelpRequestEngine;

/// Periodic timeout sweep over the help request engine.
pub struct SweepTask {
    engine: Arc<HelpRequestEngine>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl SweepTask {
    pub fn new(engine: Arc<HelpRequestEngine>, interval_secs: u64) -> Self {
        Self {
            engine,
            interval: Duration::from_secs(interval_secs.max(1)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the sweep loop until shutdown is signalled.
    pub async fn run(&self) {
        info!(interval_secs = self.interval.as_secs(), "Timeout sweep started");
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.engine.sweep_timeouts().await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "Sweep timed out pending requests"),
                        Err(e) => warn!(error = %e, "Timeout sweep failed"),
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("Timeout sweep stopped");
                    return;
                }
            }
        }
    }

    /// Signal the sweep loop to shut down gracefully.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
