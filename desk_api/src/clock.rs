//! The repeating timer that drives the simulation.
//!
//! Each tick takes the state lock, so a tick never interleaves with a user
//! operation. `stop` waits for the task to finish; once it returns no further
//! tick can fire.

use crate::state::AppState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct SimulationClock {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl SimulationClock {
    /// Spawn the timer; the first tick fires one `period` after start.
    pub fn start(state: AppState, period: Duration) -> Self {
        let (tx, mut rx) = oneshot::channel::<()>();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut rx => break,
                    _ = interval.tick() => {
                        let report = state.with(|sim| sim.tick());
                        counter.fetch_add(1, Ordering::SeqCst);
                        debug!(target: "desk", ts = report.ts.0, mid = %report.mid, "clock tick");
                    }
                }
            }
        });
        info!(target: "desk", period_ms = period.as_millis() as u64, "simulation clock started");
        Self { shutdown: Some(tx), handle: Some(handle), ticks }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ticks fired since start.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Cancel the timer and wait for it to wind down. Stopping twice is a no-op.
    pub async fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                warn!(target: "desk", error = %e, "simulation clock task failed");
            }
        }
        info!(target: "desk", ticks = self.ticks(), "simulation clock stopped");
    }
}

impl Drop for SimulationClock {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}
