//! Sync scheduler - turns settings into batch sync triggers
//!
//! The [`SyncScheduler`] emits [`SyncTrigger`] values on a channel that the
//! daemon's sync loop consumes:
//!
//! ```text
//! startup ─┐
//! interval ─┼──→ SyncScheduler ──→ mpsc::Receiver<SyncTrigger> ──→ SyncEngine::sync_all
//! manual  ─┘
//! ```
//!
//! Triggers never queue up behind a running batch: the channel is small and
//! interval/manual triggers are dropped when it is full, so a slow batch
//! delays the next run instead of stacking several.

use std::time::Duration;

use notepush_core::config::SyncConfig;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pending triggers allowed while a batch is running
const TRIGGER_CHANNEL_CAPACITY: usize = 1;

/// Why a batch sync was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The daemon just started and `sync.on_startup` is set
    Startup,
    /// The recurring interval elapsed
    Interval,
    /// Requested explicitly (e.g. "sync now")
    Manual,
}

impl std::fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncTrigger::Startup => "startup",
            SyncTrigger::Interval => "interval",
            SyncTrigger::Manual => "manual",
        };
        f.write_str(s)
    }
}

/// Cloneable handle for requesting a sync outside the schedule
#[derive(Debug, Clone)]
pub struct SyncRequester {
    tx: mpsc::Sender<SyncTrigger>,
}

impl SyncRequester {
    /// Requests an immediate sync
    ///
    /// Returns `false` if a trigger is already pending or the scheduler
    /// has stopped.
    pub fn request_sync(&self) -> bool {
        let accepted = self.tx.try_send(SyncTrigger::Manual).is_ok();
        if accepted {
            info!("Manual sync requested");
        } else {
            debug!("Manual sync request coalesced with a pending trigger");
        }
        accepted
    }
}

/// Schedules batch syncs at startup and on a recurring interval
pub struct SyncScheduler {
    on_startup: bool,
    interval: Option<Duration>,
    tx: mpsc::Sender<SyncTrigger>,
    cancel: CancellationToken,
}

impl SyncScheduler {
    /// Creates a scheduler from the `sync` settings section
    ///
    /// # Returns
    /// A tuple of `(SyncScheduler, mpsc::Receiver<SyncTrigger>)`.
    pub fn new(config: &SyncConfig) -> (Self, mpsc::Receiver<SyncTrigger>) {
        let interval = match config.interval_minutes {
            0 => None,
            minutes => Some(Duration::from_secs(minutes.saturating_mul(60))),
        };
        Self::with_interval(config.on_startup, interval)
    }

    /// Creates a scheduler with an explicit interval (`None` disables it)
    pub fn with_interval(
        on_startup: bool,
        interval: Option<Duration>,
    ) -> (Self, mpsc::Receiver<SyncTrigger>) {
        let (tx, rx) = mpsc::channel(TRIGGER_CHANNEL_CAPACITY);

        info!(
            on_startup,
            interval_secs = interval.map(|d| d.as_secs()),
            "Creating sync scheduler"
        );

        let scheduler = Self {
            on_startup,
            interval,
            tx,
            cancel: CancellationToken::new(),
        };
        (scheduler, rx)
    }

    /// Returns a handle for manual sync requests
    pub fn requester(&self) -> SyncRequester {
        SyncRequester {
            tx: self.tx.clone(),
        }
    }

    /// Token that stops [`run`](SyncScheduler::run) when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops the scheduler
    pub fn shutdown(&self) {
        info!("Sync scheduler shutdown requested");
        self.cancel.cancel();
    }

    /// Main loop: emits the startup trigger, then one trigger per interval
    ///
    /// The first interval tick fires one full period after start. Runs until
    /// cancelled or until the receiver is dropped.
    pub async fn run(self) {
        info!("Sync scheduler starting");

        if self.on_startup {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Sync scheduler stopped before startup trigger");
                    return;
                }
                sent = self.tx.send(SyncTrigger::Startup) => {
                    if sent.is_err() {
                        info!("Trigger channel closed, scheduler shutting down");
                        return;
                    }
                    debug!("Startup sync triggered");
                }
            }
        }

        let Some(period) = self.interval else {
            self.cancel.cancelled().await;
            info!("Sync scheduler stopped");
            return;
        };

        let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = timer.tick() => {
                    match self.tx.try_send(SyncTrigger::Interval) {
                        Ok(()) => debug!("Interval sync triggered"),
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            debug!("Previous sync still pending, skipping interval trigger");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            info!("Trigger channel closed, scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        }

        info!("Sync scheduler stopped");
    }
}

// ============================================================================
// Unit tests
// ============================================================================
