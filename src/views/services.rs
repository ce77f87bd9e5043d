// IPS Console - Service List View
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Dashboard of protected services.

use std::fmt;
use std::sync::Arc;

use super::{count_phrase, RemoteList};
use crate::api::{endpoints, Gateway};
use crate::models::{ServiceId, ServiceSummary};

pub type ServiceListView<G> = RemoteList<G, ServiceSummary>;

pub fn service_list<G: Gateway>(gateway: Arc<G>) -> ServiceListView<G> {
    RemoteList::new(gateway, endpoints::list_services(), "the service list")
}

/// One dashboard card, fully derived from a [`ServiceSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub id: ServiceId,
    pub name: String,
    pub running: bool,
    pub blocked_now: String,
    pub last_block: String,
    pub blocked_24h: String,
    /// The admin panel service has no delete action.
    pub deletable: bool,
}

impl ServiceCard {
    pub fn state_label(&self) -> &'static str {
        if self.running {
            "Running"
        } else {
            "Paused"
        }
    }
}

impl From<&ServiceSummary> for ServiceCard {
    fn from(summary: &ServiceSummary) -> Self {
        let last_block = match summary.last_blocked.as_deref() {
            Some(when) if !when.trim().is_empty() => format!("Last block {}", when.trim()),
            _ => "No IPs blocked yet".to_string(),
        };
        Self {
            id: summary.id,
            name: summary.name.clone(),
            running: summary.is_running(),
            blocked_now: count_phrase(
                summary.blocked_now,
                "currently blocked IP",
                "currently blocked IPs",
            ),
            last_block,
            blocked_24h: format!(
                "{} in the last 24h",
                count_phrase(summary.blocked_24h, "blocked IP", "blocked IPs")
            ),
            deletable: !summary.is_protected(),
        }
    }
}

impl fmt::Display for ServiceCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {} ({})", self.id, self.name, self.state_label())?;
        writeln!(f, "    {}", self.blocked_now)?;
        writeln!(f, "    {}", self.last_block)?;
        write!(f, "    {}", self.blocked_24h)
    }
}

impl<G: Gateway> RemoteList<G, ServiceSummary> {
    pub fn cards(&self) -> Vec<ServiceCard> {
        self.items().iter().map(ServiceCard::from).collect()
    }

    pub fn find(&self, id: ServiceId) -> Option<&ServiceSummary> {
        self.items().iter().find(|s| s.id == id)
    }

    /// Plain-text rendering of the dashboard.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner() {
            out.push_str(&format!("{}\n", banner));
        }
        if self.is_loaded() && self.items().is_empty() {
            out.push_str("No services have been created yet\n");
        }
        for card in self.cards() {
            out.push_str(&card.to_string());
            out.push('\n');
        }
        out
    }
}
