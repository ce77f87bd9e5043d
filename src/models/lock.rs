// IPS Console - Lock Resource Model
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! How a block is enforced for a service.
//!
//! The backend stores the lock as one raw string. Its kind is implied by the
//! shape of the value: a number is a firewall port, anything containing a
//! `/` is a web folder guarded by `.htaccess`, everything else is a daemon
//! name for `hosts.deny`.

use std::fmt;

/// Lock mechanism, without its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockKind {
    Firewall,
    #[default]
    Hosts,
    Htaccess,
}

impl LockKind {
    pub const ALL: [LockKind; 3] = [LockKind::Firewall, LockKind::Hosts, LockKind::Htaccess];

    /// Classify a stored raw value.
    pub fn infer(raw: &str) -> LockKind {
        if is_numeric(raw) {
            LockKind::Firewall
        } else if raw.contains('/') {
            LockKind::Htaccess
        } else {
            LockKind::Hosts
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::Firewall => "firewall",
            LockKind::Hosts => "hosts",
            LockKind::Htaccess => "htaccess",
        }
    }

    /// Label of the target input for this kind.
    pub fn target_label(&self) -> &'static str {
        match self {
            LockKind::Firewall => "Port",
            LockKind::Hosts => "Daemon name",
            LockKind::Htaccess => "Web folder",
        }
    }

    pub fn target_placeholder(&self) -> &'static str {
        match self {
            LockKind::Firewall => "22",
            LockKind::Hosts => "sshd",
            LockKind::Htaccess => "/var/www/html/wp-admin",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firewall" | "port" => Ok(LockKind::Firewall),
            "hosts" | "daemon" => Ok(LockKind::Hosts),
            "htaccess" | "web" => Ok(LockKind::Htaccess),
            other => {
                let known: Vec<_> = LockKind::ALL.iter().map(|k| k.as_str()).collect();
                Err(format!(
                    "unknown lock kind '{}' (expected {})",
                    other,
                    known.join(", ")
                ))
            }
        }
    }
}

/// A lock mechanism together with its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockResource {
    Firewall { port: u16 },
    Hosts { daemon: String },
    Htaccess { folder: String },
}

impl LockResource {
    /// Rebuild a lock from the raw stored value.
    pub fn infer(raw: &str) -> Result<Self, &'static str> {
        Self::parse(LockKind::infer(raw), raw)
    }

    /// Validate `raw` as a target for `kind`.
    pub fn parse(kind: LockKind, raw: &str) -> Result<Self, &'static str> {
        match kind {
            LockKind::Firewall => raw
                .parse::<u16>()
                .map(|port| LockResource::Firewall { port })
                .map_err(|_| "must be a port number between 0 and 65535"),
            LockKind::Hosts => {
                if raw.is_empty() {
                    Err("can't be empty")
                } else if is_numeric(raw) {
                    Err("can't be a number")
                } else if raw.chars().any(char::is_whitespace) {
                    Err("can't have spaces")
                } else {
                    Ok(LockResource::Hosts {
                        daemon: raw.to_string(),
                    })
                }
            }
            LockKind::Htaccess => {
                if raw.is_empty() {
                    Err("can't be empty")
                } else if !raw.contains('/') {
                    Err("must contain '/'")
                } else {
                    Ok(LockResource::Htaccess {
                        folder: raw.to_string(),
                    })
                }
            }
        }
    }

    pub fn kind(&self) -> LockKind {
        match self {
            LockResource::Firewall { .. } => LockKind::Firewall,
            LockResource::Hosts { .. } => LockKind::Hosts,
            LockResource::Htaccess { .. } => LockKind::Htaccess,
        }
    }

    /// The raw value the backend stores.
    pub fn encode(&self) -> String {
        match self {
            LockResource::Firewall { port } => port.to_string(),
            LockResource::Hosts { daemon } => daemon.clone(),
            LockResource::Htaccess { folder } => folder.clone(),
        }
    }
}

/// Any decimal number, signed or fractional. `inf` and `nan` are names.
fn is_numeric(raw: &str) -> bool {
    let raw = raw.trim();
    raw.chars().any(|c| c.is_ascii_digit()) && raw.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(LockKind::infer("22"), LockKind::Firewall);
        assert_eq!(LockKind::infer("/var/www/html/wp-admin"), LockKind::Htaccess);
        assert_eq!(LockKind::infer("sshd"), LockKind::Hosts);
        assert_eq!(LockKind::infer(""), LockKind::Hosts);
        assert_eq!(LockKind::infer("1.5"), LockKind::Firewall);
        assert_eq!(LockKind::infer("-3"), LockKind::Firewall);
        assert_eq!(LockKind::infer("nan"), LockKind::Hosts);
    }

    #[test]
    fn test_hosts_validation() {
        assert_eq!(LockResource::parse(LockKind::Hosts, "10"), Err("can't be a number"));
        assert_eq!(LockResource::parse(LockKind::Hosts, "1.5"), Err("can't be a number"));
        assert_eq!(LockResource::parse(LockKind::Hosts, "-3"), Err("can't be a number"));
        assert_eq!(LockResource::parse(LockKind::Hosts, "1e3"), Err("can't be a number"));
        assert!(LockResource::parse(LockKind::Hosts, "inf").is_ok());
        assert_eq!(LockResource::parse(LockKind::Hosts, "my daemon"), Err("can't have spaces"));
        assert_eq!(
            LockResource::parse(LockKind::Hosts, "vsftpd"),
            Ok(LockResource::Hosts { daemon: "vsftpd".into() })
        );
    }

    #[test]
    fn test_htaccess_validation() {
        assert_eq!(LockResource::parse(LockKind::Htaccess, "adminpanel"), Err("must contain '/'"));
        assert!(LockResource::parse(LockKind::Htaccess, "/srv/www/adminpanel").is_ok());
    }

    #[test]
    fn test_firewall_validation() {
        assert!(LockResource::parse(LockKind::Firewall, "70000").is_err());
        assert!(LockResource::parse(LockKind::Firewall, "ssh").is_err());
        assert_eq!(
            LockResource::parse(LockKind::Firewall, "2222"),
            Ok(LockResource::Firewall { port: 2222 })
        );
    }

    proptest! {
        #[test]
        fn prop_port_round_trip(port in any::<u16>()) {
            let raw = port.to_string();
            let lock = LockResource::infer(&raw).unwrap();
            prop_assert_eq!(lock.kind(), LockKind::Firewall);
            prop_assert_eq!(lock.encode(), raw);
        }

        #[test]
        fn prop_folder_round_trip(raw in "[a-z_]{0,8}/[a-z/_-]{0,20}") {
            let lock = LockResource::infer(&raw).unwrap();
            prop_assert_eq!(lock.kind(), LockKind::Htaccess);
            prop_assert_eq!(lock.encode(), raw);
        }

        #[test]
        fn prop_daemon_round_trip(raw in "[a-z][a-z0-9_.-]{0,15}") {
            let lock = LockResource::infer(&raw).unwrap();
            prop_assert_eq!(lock.kind(), LockKind::Hosts);
            prop_assert_eq!(lock.encode(), raw);
        }
    }
}
