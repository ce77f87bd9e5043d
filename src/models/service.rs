// IPS Console - Service Model
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Protected service model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::LockResource;

/// Backend-assigned service identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ServiceId)
    }
}

/// Kind of service being protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// The console's own admin panel. Exactly one exists and it can't be deleted.
    #[serde(rename = "none", alias = "easips")]
    SelfManaged,
    Ssh,
    Joomla,
    Wordpress,
    Phpmyadmin,
}

impl ServiceType {
    /// Types an operator can pick when creating a service.
    pub const SELECTABLE: [ServiceType; 4] = [
        ServiceType::Ssh,
        ServiceType::Joomla,
        ServiceType::Wordpress,
        ServiceType::Phpmyadmin,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::SelfManaged => "none",
            ServiceType::Ssh => "ssh",
            ServiceType::Joomla => "joomla",
            ServiceType::Wordpress => "wordpress",
            ServiceType::Phpmyadmin => "phpmyadmin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::SelfManaged => "Admin panel",
            ServiceType::Ssh => "SSH",
            ServiceType::Joomla => "Joomla",
            ServiceType::Wordpress => "WordPress",
            ServiceType::Phpmyadmin => "phpMyAdmin",
        }
    }

    pub fn is_protected(&self) -> bool {
        *self == ServiceType::SelfManaged
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "easips" => Ok(ServiceType::SelfManaged),
            "ssh" => Ok(ServiceType::Ssh),
            "joomla" => Ok(ServiceType::Joomla),
            "wordpress" => Ok(ServiceType::Wordpress),
            "phpmyadmin" => Ok(ServiceType::Phpmyadmin),
            other => {
                let known: Vec<_> = ServiceType::SELECTABLE.iter().map(|t| t.as_str()).collect();
                Err(format!(
                    "unknown service type '{}' (expected {})",
                    other,
                    known.join(", ")
                ))
            }
        }
    }
}

/// One entry of `GET /services`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceSummary {
    pub id: ServiceId,
    pub name: String,
    #[serde(rename = "service", default)]
    pub kind: Option<ServiceType>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub stopped: bool,
    #[serde(default)]
    pub blocked_now: u32,
    #[serde(default)]
    pub blocked_24h: u32,
    /// Already humanized by the backend ("3 minutes ago").
    #[serde(default)]
    pub last_blocked: Option<String>,
}

impl ServiceSummary {
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn is_protected(&self) -> bool {
        self.kind.map(|k| k.is_protected()).unwrap_or(false)
    }
}

/// Full record of `GET /services/{id}`, used to populate the settings form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub name: String,
    pub service: ServiceType,
    pub time_threshold: u32,
    pub max_attempts: u32,
    /// `None` or `0` means permanent.
    #[serde(default)]
    pub block_duration: Option<u32>,
    #[serde(default)]
    pub log_path: Option<String>,
    /// Raw lock value; its kind is inferred (see [`LockResource::infer`]).
    #[serde(default)]
    pub lock_resource: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub stopped: bool,
}

impl ServiceRecord {
    pub fn lock(&self) -> Option<LockResource> {
        if self.service.is_protected() {
            return None;
        }
        self.lock_resource
            .as_deref()
            .and_then(|raw| LockResource::infer(raw).ok())
    }
}

/// The backend has sent `stopped` as a bool, a number and a string at
/// different times.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        serde_json::Value::String(s) => {
            !matches!(s.trim().to_lowercase().as_str(), "" | "false" | "0")
        }
        serde_json::Value::Null => false,
        _ => true,
    })
}
