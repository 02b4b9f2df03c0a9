use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Signals background tasks to stop when the process shuts down
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        // send_replace does not fail when every receiver is gone
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a liveness line every `interval` until shutdown fires.
///
/// The first line is logged immediately. Returns the number of lines logged.
pub async fn run_keep_alive(interval: Duration, mut shutdown: watch::Receiver<bool>) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut beats = 0u64;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                beats += 1;
                tracing::info!(beats, "Bot is alive and running");
            }
            changed = shutdown.changed() => {
                // Sender dropped counts as shutdown too
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!(beats, "Keep-alive task stopped");
    beats
}

/// Spawn the keep-alive loop on the current runtime
pub fn spawn_keep_alive(interval: Duration, shutdown: &Shutdown) -> JoinHandle<u64> {
    tokio::spawn(run_keep_alive(interval, shutdown.subscribe()))
}
