// IPS Console - Models
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Data models for backend entities.

mod ip;
mod lock;
mod service;

pub use ip::{
    normalize_address, AddressStatus, DynamicBlockRecord, RuleKind, StaticRule, Timestamp,
};
pub use lock::{LockKind, LockResource};
pub use service::{ServiceId, ServiceRecord, ServiceSummary, ServiceType};
