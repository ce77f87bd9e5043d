// IPS Console - IP Rule List View
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Per-service view of blocked addresses and static rules.
//!
//! The dynamic and static lists are polled independently. The combined view
//! is recomposed from both on every render, with row numbers local to that
//! render.

use std::fmt::Write as _;
use std::sync::Arc;

use super::{Banner, RemoteList};
use crate::api::{endpoints, Gateway};
use crate::models::{
    normalize_address, AddressStatus, DynamicBlockRecord, RuleKind, ServiceId, StaticRule,
    Timestamp,
};

pub type DynamicBlockList<G> = RemoteList<G, DynamicBlockRecord>;
pub type StaticRuleList<G> = RemoteList<G, StaticRule>;

pub fn blocked_list<G: Gateway>(gateway: Arc<G>, service: ServiceId) -> DynamicBlockList<G> {
    RemoteList::new(gateway, endpoints::list_blocked(service), "the list of blocked IPs")
}

pub fn static_list<G: Gateway>(gateway: Arc<G>, service: ServiceId) -> StaticRuleList<G> {
    RemoteList::new(gateway, endpoints::list_static(service), "the list of static rules")
}

/// What the operator can do on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Clear the dynamic block.
    Unblock,
    /// Delete the static rule behind the row.
    RemoveRule,
}

/// A row of the blocked-addresses table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRow {
    pub index: usize,
    pub address: String,
    pub blocked_at: Timestamp,
    pub status: AddressStatus,
    pub action: Option<RowAction>,
}

/// A row of the static-rules table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    pub index: usize,
    pub address: String,
    pub added_at: Timestamp,
    pub kind: RuleKind,
}

/// Reconciled view of one service's dynamic blocks and static rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpRuleListView {
    pub blocked: Vec<IpRow>,
    pub rules: Vec<RuleRow>,
    pub banner: Option<Banner>,
}

impl IpRuleListView {
    pub fn compose(dynamic: &[DynamicBlockRecord], rules: &[StaticRule]) -> Self {
        let blocked = dynamic
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let status = AddressStatus::for_record(record, rules);
                let action = match status {
                    AddressStatus::Blocked => Some(RowAction::Unblock),
                    // Blacklisted addresses are released by removing the rule.
                    AddressStatus::Blacklisted => Some(RowAction::RemoveRule),
                    _ => None,
                };
                IpRow {
                    index: i + 1,
                    address: record.ip_address.clone(),
                    blocked_at: record.blocked_at.clone(),
                    status,
                    action,
                }
            })
            .collect();

        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| RuleRow {
                index: i + 1,
                address: rule.ip_address.clone(),
                added_at: rule.added_at.clone(),
                kind: rule.kind(),
            })
            .collect();

        Self {
            blocked,
            rules,
            banner: None,
        }
    }

    /// Compose from the two polled lists, surfacing the first failure banner.
    pub fn from_lists<G: Gateway>(
        dynamic: &DynamicBlockList<G>,
        rules: &StaticRuleList<G>,
    ) -> Self {
        let mut view = Self::compose(dynamic.items(), rules.items());
        view.banner = dynamic.banner().or(rules.banner()).cloned();
        view
    }

    /// The row of `address` offering an action, or its first row.
    pub fn row(&self, address: &str) -> Option<&IpRow> {
        let address = normalize_address(address);
        let mut rows = self
            .blocked
            .iter()
            .filter(|r| normalize_address(&r.address) == address);
        let first = rows.clone().next();
        rows.find(|r| r.action.is_some()).or(first)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = &self.banner {
            let _ = writeln!(out, "{}", banner);
        }

        let _ = writeln!(out, "Blocked IPs");
        if self.blocked.is_empty() {
            let _ = writeln!(out, "    No IP addresses have been blocked yet");
        }
        for row in &self.blocked {
            let action = match row.action {
                Some(RowAction::Unblock) => "[unblock]",
                Some(RowAction::RemoveRule) => "[remove rule]",
                None => "",
            };
            let _ = writeln!(
                out,
                "{:>4}  {:<39} {:<19}  {:<11} {}",
                row.index,
                row.address,
                row.blocked_at.to_string(),
                row.status.label(),
                action
            );
        }

        let _ = writeln!(out, "Static rules");
        if self.rules.is_empty() {
            let _ = writeln!(out, "    No static rules");
        }
        for row in &self.rules {
            let _ = writeln!(
                out,
                "{:>4}  {:<39} {:<19}  {}",
                row.index,
                row.address,
                row.added_at.to_string(),
                row.kind.label()
            );
        }
        out
    }
}
