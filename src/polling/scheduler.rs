// IPS Console - Polling Scheduler
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Cooperative refresh loop owning a single pending task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Countdown, Refresh, Tick};
use crate::error::ApiError;

/// Events emitted by a running scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Seconds left until the next automatic refresh.
    Countdown(u32),
    /// The view was replaced with fresh data.
    Refreshed,
    /// The fetch failed; the view kept its previous state.
    Failed(ApiError),
}

/// Cheap handle other components use to force an out-of-cycle refresh.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    wake: Arc<Notify>,
    running: Arc<AtomicBool>,
}

impl RefreshHandle {
    /// Request a refresh. Requests made while a fetch is running are
    /// coalesced into one follow-up fetch. Ignored while stopped.
    pub fn trigger(&self) {
        if self.running.load(Ordering::SeqCst) {
            self.wake.notify_one();
        } else {
            debug!("Polling scheduler stopped, ignoring refresh request");
        }
    }
}

/// Drives periodic refreshes of one view.
///
/// At most one loop task exists per scheduler; [`start`](Self::start) on a
/// running scheduler is refused instead of arming a second loop.
pub struct PollingScheduler {
    interval: u32,
    wake: Arc<Notify>,
    running: Arc<AtomicBool>,
    events: broadcast::Sender<PollEvent>,
    task: Option<JoinHandle<()>>,
}

impl PollingScheduler {
    /// Create a stopped scheduler refreshing every `interval_secs` seconds.
    pub fn new(interval_secs: u32) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            interval: interval_secs.max(1),
            wake: Arc::new(Notify::new()),
            running: Arc::new(AtomicBool::new(false)),
            events,
            task: None,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Subscribe to countdown and refresh events.
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.events.subscribe()
    }

    pub fn handle(&self) -> RefreshHandle {
        RefreshHandle {
            wake: Arc::clone(&self.wake),
            running: Arc::clone(&self.running),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Start refreshing `target`, beginning with an immediate fetch.
    ///
    /// Returns `false` if the scheduler is already running.
    pub fn start<R: Refresh>(&mut self, target: Arc<Mutex<R>>) -> bool {
        if self.is_running() {
            warn!("Polling scheduler already running, ignoring start");
            return false;
        }

        debug!("Starting polling scheduler ({}s interval)", self.interval);
        let task = tokio::spawn(run_loop(
            self.interval,
            target,
            Arc::clone(&self.wake),
            self.events.clone(),
        ));
        self.task = Some(task);
        self.running.store(true, Ordering::SeqCst);
        true
    }

    /// Force a refresh now without waiting for the countdown. Ignored while
    /// stopped; use [`run_once`](Self::run_once) there.
    pub fn refresh_now(&self) {
        self.handle().trigger();
    }

    /// Fetch once without arming the loop. Subscribers see the outcome.
    pub async fn run_once<R: Refresh>(&self, target: &Mutex<R>) -> Result<(), ApiError> {
        let result = refresh_unlocked(target).await;
        let _ = self.events.send(match &result {
            Ok(()) => PollEvent::Refreshed,
            Err(e) => PollEvent::Failed(e.clone()),
        });
        result
    }

    /// Stop the loop. The view keeps its last state and can be restarted.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            debug!("Stopping polling scheduler");
            task.abort();
        }
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop<R: Refresh>(
    interval: u32,
    target: Arc<Mutex<R>>,
    wake: Arc<Notify>,
    events: broadcast::Sender<PollEvent>,
) {
    let mut countdown = Countdown::new(interval);
    // Initial load.
    countdown.request_refresh();

    loop {
        match countdown.tick() {
            Tick::Due => {
                debug!(
                    "Refreshing ({})",
                    if countdown.is_manual_pending() { "requested" } else { "scheduled" }
                );
                // Requests made before this fetch are satisfied by it.
                tokio::select! {
                    biased;
                    _ = wake.notified() => {}
                    _ = std::future::ready(()) => {}
                }
                let result = refresh_unlocked(&*target).await;
                // Reset even on failure so a dead backend is retried at the
                // normal pace instead of every tick.
                countdown.reset();
                let _ = events.send(match result {
                    Ok(()) => PollEvent::Refreshed,
                    Err(e) => PollEvent::Failed(e),
                });
                let _ = events.send(PollEvent::Countdown(countdown.remaining()));
            }
            Tick::Waiting(remaining) => {
                let _ = events.send(PollEvent::Countdown(remaining));
            }
        }

        // Armed only after the previous cycle finished.
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = wake.notified() => countdown.request_refresh(),
        }
    }
}

/// The view is locked only to start the fetch and to apply its result.
async fn refresh_unlocked<R: Refresh>(target: &Mutex<R>) -> Result<(), ApiError> {
    let fetch = target.lock().await.fetch();
    let result = fetch.await;
    target.lock().await.apply(result)
}
