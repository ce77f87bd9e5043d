// IPS Console - Polling Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Self-correcting periodic refresh of list views.
//!
//! A view is refreshed when its countdown reaches zero or when someone asks
//! for it. Each fetch is awaited before the next tick is armed, so one view
//! never has two fetches in flight.

mod countdown;
mod scheduler;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::ApiError;

pub use countdown::{Countdown, Tick};
pub use scheduler::{PollEvent, PollingScheduler, RefreshHandle};

/// Default seconds between two automatic refreshes.
pub const DEFAULT_INTERVAL_SECS: u32 = 5;

/// A detached fetch. It owns everything it needs, so the view stays
/// unlocked while the request is in flight.
pub type Fetch<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// Something that can re-fetch its state from the backend.
///
/// Implementations replace their whole state on success and keep the last
/// good state on failure.
#[async_trait]
pub trait Refresh: Send + 'static {
    type Snapshot: Send + 'static;

    /// Start a fetch without touching the current state.
    fn fetch(&self) -> Fetch<Self::Snapshot>;

    /// Apply a finished fetch.
    fn apply(&mut self, result: Result<Self::Snapshot, ApiError>) -> Result<(), ApiError>;

    async fn refresh(&mut self) -> Result<(), ApiError> {
        let result = self.fetch().await;
        self.apply(result)
    }
}
