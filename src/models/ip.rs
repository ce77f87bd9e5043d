// IPS Console - IP Rule Model
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Dynamic blocks, static rules and how they combine.
//!
//! Static rules always win: a whitelisted address is never shown as blocked,
//! and a blacklisted address can only be released by removing the rule.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Marker the backend puts in `blocked_at` for blacklist entries it appends
/// to the dynamic list.
pub const BLACKLISTED_MARKER: &str = "Blacklisted";

/// A timestamp as sent by the backend, or its raw text when unparseable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Timestamp {
    At(NaiveDateTime),
    Label(String),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
                return Timestamp::At(at);
            }
        }
        if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
            return Timestamp::At(at.naive_utc());
        }
        Timestamp::Label(raw.to_string())
    }

    pub fn is_label(&self, label: &str) -> bool {
        matches!(self, Timestamp::Label(l) if l == label)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Timestamp::parse(&raw)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Label(label) => f.write_str(label),
        }
    }
}

/// An entry of `GET /services/{id}/blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DynamicBlockRecord {
    pub ip_address: String,
    pub blocked_at: Timestamp,
    /// `false` once expired or manually unblocked.
    pub active: bool,
}

impl DynamicBlockRecord {
    /// Blacklist entries the backend appends to the dynamic list.
    pub fn is_blacklist_entry(&self) -> bool {
        self.blocked_at.is_label(BLACKLISTED_MARKER)
    }
}

/// Whitelist or blacklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Whitelist,
    Blacklist,
}

impl RuleKind {
    pub fn from_blocked(blocked: bool) -> Self {
        if blocked {
            RuleKind::Blacklist
        } else {
            RuleKind::Whitelist
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Whitelist => "Whitelist",
            RuleKind::Blacklist => "Blacklist",
        }
    }
}

/// An entry of `GET /services/{id}/static`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaticRule {
    pub ip_address: String,
    pub added_at: Timestamp,
    /// `true` = blacklist, `false` = whitelist.
    pub blocked: bool,
}

impl StaticRule {
    pub fn kind(&self) -> RuleKind {
        RuleKind::from_blocked(self.blocked)
    }
}

/// Effective state of an address for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressStatus {
    Whitelisted,
    Blacklisted,
    /// Actively blocked by the detection engine.
    Blocked,
    /// Has a dynamic history but no active block.
    Unblocked,
    /// Not known to either list.
    Unknown,
}

impl AddressStatus {
    /// Resolve the status of `address`. Static rules take precedence.
    pub fn resolve(address: &str, dynamic: &[DynamicBlockRecord], rules: &[StaticRule]) -> Self {
        let address = normalize_address(address);
        if let Some(status) = Self::from_rules(&address, rules) {
            return status;
        }

        let mut seen = false;
        for record in dynamic
            .iter()
            .filter(|r| normalize_address(&r.ip_address) == address)
        {
            if record.is_blacklist_entry() {
                return AddressStatus::Blacklisted;
            }
            if record.active {
                return AddressStatus::Blocked;
            }
            seen = true;
        }

        if seen {
            AddressStatus::Unblocked
        } else {
            AddressStatus::Unknown
        }
    }

    /// Status of a single dynamic record once static rules are applied.
    /// An expired record is history: it stays unblocked whatever rule now
    /// covers its address.
    pub fn for_record(record: &DynamicBlockRecord, rules: &[StaticRule]) -> Self {
        let marker = record.is_blacklist_entry();
        if !record.active && !marker {
            return AddressStatus::Unblocked;
        }
        if let Some(status) = Self::from_rules(&normalize_address(&record.ip_address), rules) {
            return status;
        }
        if marker {
            AddressStatus::Blacklisted
        } else {
            AddressStatus::Blocked
        }
    }

    fn from_rules(address: &str, rules: &[StaticRule]) -> Option<Self> {
        rules
            .iter()
            .find(|r| normalize_address(&r.ip_address) == address)
            .map(|rule| match rule.kind() {
                RuleKind::Whitelist => AddressStatus::Whitelisted,
                RuleKind::Blacklist => AddressStatus::Blacklisted,
            })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AddressStatus::Whitelisted => "Whitelisted",
            AddressStatus::Blacklisted => "Blacklisted",
            AddressStatus::Blocked => "Active",
            AddressStatus::Unblocked => "Unblocked",
            AddressStatus::Unknown => "Unknown",
        }
    }
}

/// Addresses compare case-insensitively (IPv6) and without surrounding blanks.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str, at: &str, active: bool) -> DynamicBlockRecord {
        DynamicBlockRecord {
            ip_address: ip.to_string(),
            blocked_at: Timestamp::parse(at),
            active,
        }
    }

    fn rule(ip: &str, blocked: bool) -> StaticRule {
        StaticRule {
            ip_address: ip.to_string(),
            added_at: Timestamp::parse("2026-01-02 10:00:00"),
            blocked,
        }
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(matches!(Timestamp::parse("2026-03-01 12:30:45.123456"), Timestamp::At(_)));
        assert!(matches!(Timestamp::parse("Sun, 01 Mar 2026 12:30:45 GMT"), Timestamp::At(_)));
        assert_eq!(Timestamp::parse("Blacklisted"), Timestamp::Label("Blacklisted".into()));
        assert_eq!(
            Timestamp::parse("2026-03-01 12:30:45.5").to_string(),
            "2026-03-01 12:30:45"
        );
    }

    #[test]
    fn test_blocked_list_json() {
        let json = r#"[
            {"ip_address": "10.0.0.1", "blocked_at": "2026-03-01 12:30:45", "active": true},
            {"ip_address": "10.0.0.9", "blocked_at": "Blacklisted", "active": true}
        ]"#;
        let list: Vec<DynamicBlockRecord> = serde_json::from_str(json).unwrap();
        assert!(!list[0].is_blacklist_entry());
        assert!(list[1].is_blacklist_entry());
    }

    #[test]
    fn test_static_rule_wins_over_dynamic() {
        let dynamic = vec![record("10.0.0.1", "2026-03-01 12:00:00", true)];
        let rules = vec![rule("10.0.0.1", false)];
        assert_eq!(
            AddressStatus::resolve("10.0.0.1", &dynamic, &rules),
            AddressStatus::Whitelisted
        );
    }

    #[test]
    fn test_dynamic_only() {
        let dynamic = vec![
            record("10.0.0.2", "2026-03-01 12:00:00", false),
            record("10.0.0.3", "2026-03-01 12:00:00", true),
        ];
        assert_eq!(AddressStatus::resolve("10.0.0.2", &dynamic, &[]), AddressStatus::Unblocked);
        assert_eq!(AddressStatus::resolve("10.0.0.3", &dynamic, &[]), AddressStatus::Blocked);
        assert_eq!(AddressStatus::resolve("10.0.0.4", &dynamic, &[]), AddressStatus::Unknown);
    }

    #[test]
    fn test_per_record_status() {
        let rules = vec![rule("10.0.0.5", false)];
        let whitelisted = record("10.0.0.5", "2026-03-01 12:00:00", true);
        let expired = record("10.0.0.6", "2026-03-01 12:00:00", false);
        let blacklisted = record("10.0.0.7", "Blacklisted", true);
        assert_eq!(AddressStatus::for_record(&whitelisted, &rules), AddressStatus::Whitelisted);
        assert_eq!(AddressStatus::for_record(&expired, &rules), AddressStatus::Unblocked);
        assert_eq!(AddressStatus::for_record(&blacklisted, &rules), AddressStatus::Blacklisted);
    }

    #[test]
    fn test_expired_record_ignores_rules() {
        let rules = vec![rule("10.0.0.8", true), rule("10.0.0.9", false)];
        let expired = record("10.0.0.8", "2026-03-01 12:00:00", false);
        let marker = record("10.0.0.8", "Blacklisted", true);
        let whitelisted = record("10.0.0.9", "2026-03-01 12:00:00", false);
        assert_eq!(AddressStatus::for_record(&expired, &rules), AddressStatus::Unblocked);
        assert_eq!(AddressStatus::for_record(&marker, &rules), AddressStatus::Blacklisted);
        assert_eq!(AddressStatus::for_record(&whitelisted, &rules), AddressStatus::Unblocked);
    }

    #[test]
    fn test_address_comparison_ignores_case() {
        let rules = vec![rule("FE80::1", true)];
        assert_eq!(AddressStatus::resolve("fe80::1", &[], &rules), AddressStatus::Blacklisted);
    }
}
