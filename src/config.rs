// IPS Console - Configuration
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Console settings stored in a local JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::DEFAULT_BASE_URL;
use crate::polling::DEFAULT_INTERVAL_SECS;

/// Persisted console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// API root of the backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Seconds between two automatic refreshes of a watched view.
    #[serde(default = "default_interval")]
    pub refresh_interval_secs: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_interval() -> u32 { DEFAULT_INTERVAL_SECS }
fn default_timeout() -> u64 { 10 }

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            refresh_interval_secs: default_interval(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Settings manager that persists to a JSON file.
#[derive(Debug)]
pub struct Settings {
    settings: ConsoleSettings,
    path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Load from the user's config directory.
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ips-console")
            .join("settings.json");
        Self::load_from(path)
    }

    /// Load from `path`, falling back to defaults if it is missing or broken.
    pub fn load_from(path: PathBuf) -> Self {
        let settings = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to parse settings: {}", e);
                        ConsoleSettings::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings: {}", e);
                    ConsoleSettings::default()
                }
            }
        } else {
            debug!("No settings at {}, using defaults", path.display());
            ConsoleSettings::default()
        };

        Self { settings, path }
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(&self.settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to save settings to {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn server_url(&self) -> &str {
        &self.settings.server_url
    }

    /// Set the backend API root. Only http(s) URLs are accepted.
    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        let parsed = reqwest::Url::parse(url.trim())
            .with_context(|| format!("Invalid server URL '{}'", url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Server URL must use http or https, got '{}'", parsed.scheme());
        }
        self.settings.server_url = parsed.to_string();
        Ok(())
    }

    pub fn refresh_interval(&self) -> u32 {
        self.settings.refresh_interval_secs
    }

    pub fn set_refresh_interval(&mut self, secs: u32) -> Result<()> {
        if secs == 0 {
            bail!("Refresh interval must be at least one second");
        }
        self.settings.refresh_interval_secs = secs;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs.max(1))
    }

    pub fn set_request_timeout(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            bail!("Request timeout must be at least one second");
        }
        self.settings.request_timeout_secs = secs;
        Ok(())
    }
}
