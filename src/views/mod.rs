// IPS Console - Views Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! List views derived from the latest successful fetch.
//!
//! Views are rebuilt from scratch on every refresh. A failed refresh keeps
//! the previous items and raises a banner instead.

mod ip_rules;
mod list;
mod services;

use std::fmt;

use crate::error::ApiError;

pub use ip_rules::{
    blocked_list, static_list, DynamicBlockList, IpRuleListView, RowAction, StaticRuleList,
};
pub use list::RemoteList;
pub use services::{service_list, ServiceCard, ServiceListView};

/// Dismissable overlay shown over a list whose last refresh failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub offer_reload: bool,
}

impl Banner {
    /// Banner for a failed attempt to load `what` ("the service list").
    pub fn refresh_failed(error: &ApiError, what: &str) -> Self {
        Self {
            message: error.describe(&format!("load {}", what)),
            offer_reload: true,
        }
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "! {}", self.message)?;
        if self.offer_reload {
            f.write_str(" (press Enter to reload)")?;
        }
        Ok(())
    }
}

/// "1 blocked IP", "3 blocked IPs", "No blocked IPs".
pub(crate) fn count_phrase(count: u32, singular: &str, plural: &str) -> String {
    match count {
        0 => format!("No {}", plural),
        1 => format!("1 {}", singular),
        n => format!("{} {}", n, plural),
    }
}
