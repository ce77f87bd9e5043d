// IPS Console - Refresh Countdown
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Per-second countdown driving periodic refreshes.

/// Result of one cooperative tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A fetch must run now.
    Due,
    /// Not yet; this many seconds remain.
    Waiting(u32),
}

/// Seconds left until the next refresh, plus a pending manual request.
#[derive(Debug, Clone)]
pub struct Countdown {
    interval: u32,
    remaining: u32,
    manual: bool,
}

impl Countdown {
    pub fn new(interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            remaining: interval,
            manual: false,
        }
    }

    /// Value for the visible countdown label.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_manual_pending(&self) -> bool {
        self.manual
    }

    /// Ask for a refresh on the next tick regardless of the countdown.
    pub fn request_refresh(&mut self) {
        self.manual = true;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Tick {
        if self.manual {
            return Tick::Due;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Tick::Due
        } else {
            Tick::Waiting(self.remaining)
        }
    }

    /// A fetch finished, successful or not.
    pub fn reset(&mut self) {
        self.remaining = self.interval;
        self.manual = false;
    }
}
