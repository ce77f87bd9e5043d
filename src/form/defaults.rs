// IPS Console - Recommended Settings
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

use crate::models::{LockKind, ServiceType};

/// Known-good log and lock settings for a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedSettings {
    pub log_path: &'static str,
    pub lock_kind: LockKind,
    pub lock_target: &'static str,
}

/// Recommended settings for `service`, `None` for the admin panel.
pub fn recommended(service: ServiceType) -> Option<RecommendedSettings> {
    let settings = match service {
        ServiceType::SelfManaged => return None,
        ServiceType::Ssh => RecommendedSettings {
            log_path: "/var/log/auth.log",
            lock_kind: LockKind::Hosts,
            lock_target: "sshd",
        },
        ServiceType::Wordpress => RecommendedSettings {
            log_path: "/var/log/apache2/access.log",
            lock_kind: LockKind::Htaccess,
            lock_target: "/var/www/html/wp-admin",
        },
        ServiceType::Joomla => RecommendedSettings {
            log_path: "/var/log/apache2/error.log",
            lock_kind: LockKind::Htaccess,
            lock_target: "/var/www/html/administrator",
        },
        ServiceType::Phpmyadmin => RecommendedSettings {
            log_path: "/var/log/apache2/access.log",
            lock_kind: LockKind::Htaccess,
            lock_target: "/usr/share/phpmyadmin",
        },
    };
    Some(settings)
}
