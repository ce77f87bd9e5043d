// IPS Console - Service Form Fields
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Raw field values of the service settings form and everything derived
//! from them: visibility, labels, hint text and validation.

use crate::error::{Field, FieldError};
use crate::models::{LockKind, LockResource, ServiceRecord, ServiceType};

/// Field values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub service_type: Option<ServiceType>,
    pub log_path: String,
    pub lock_kind: LockKind,
    pub lock_target: String,
    pub max_attempts: String,
    /// Minutes; empty or `0` means permanent.
    pub block_duration: String,
    pub time_threshold: String,
}

impl FormFields {
    pub fn from_record(record: &ServiceRecord) -> Self {
        let lock_target = record.lock_resource.clone().unwrap_or_default();
        Self {
            name: record.name.clone(),
            service_type: Some(record.service),
            log_path: record.log_path.clone().unwrap_or_default(),
            lock_kind: LockKind::infer(&lock_target),
            lock_target,
            max_attempts: record.max_attempts.to_string(),
            block_duration: record
                .block_duration
                .map(|d| d.to_string())
                .unwrap_or_default(),
            time_threshold: record.time_threshold.to_string(),
        }
    }

    /// Text value of a free-text field. `None` for fields that aren't free text.
    pub fn text(&self, field: Field) -> Option<&str> {
        Some(match field {
            Field::Name => self.name.as_str(),
            Field::LogPath => self.log_path.as_str(),
            Field::LockTarget => self.lock_target.as_str(),
            Field::MaxAttempts => self.max_attempts.as_str(),
            Field::BlockDuration => self.block_duration.as_str(),
            Field::TimeThreshold => self.time_threshold.as_str(),
            Field::ServiceType | Field::Password => return None,
        })
    }

    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        Some(match field {
            Field::Name => &mut self.name,
            Field::LogPath => &mut self.log_path,
            Field::LockTarget => &mut self.lock_target,
            Field::MaxAttempts => &mut self.max_attempts,
            Field::BlockDuration => &mut self.block_duration,
            Field::TimeThreshold => &mut self.time_threshold,
            Field::ServiceType | Field::Password => return None,
        })
    }

    /// One-line summary of the detection rule the form describes.
    pub fn hint(&self) -> String {
        let attempts = placeholder(&self.max_attempts);
        let threshold = placeholder(&self.time_threshold);
        let duration = match self.block_duration.trim() {
            "" | "0" => "permanently".to_string(),
            minutes => format!("for {} minutes", minutes),
        };
        format!(
            "An IP with {} failed attempts within {} minutes will be blocked {}",
            attempts, threshold, duration
        )
    }

    /// Check every field. The first problem found is returned.
    pub fn validate(&self, protected: bool) -> Result<(), FieldError> {
        if self.name.trim().is_empty() {
            return Err(FieldError::new(Field::Name, "is required"));
        }

        if !protected {
            if self.service_type.is_none() {
                return Err(FieldError::new(Field::ServiceType, "is required"));
            }
            if self.log_path.trim().is_empty() {
                return Err(FieldError::new(Field::LogPath, "is required"));
            }
            LockResource::parse(self.lock_kind, self.lock_target.trim())
                .map_err(|msg| FieldError::new(Field::LockTarget, msg))?;
        }

        positive(Field::MaxAttempts, &self.max_attempts)?;
        positive(Field::TimeThreshold, &self.time_threshold)?;

        let duration = self.block_duration.trim();
        if !duration.is_empty() && duration.parse::<u32>().is_err() {
            return Err(FieldError::new(
                Field::BlockDuration,
                "must be a whole number of minutes",
            ));
        }

        Ok(())
    }

    /// Form body for `POST /services[/{id}]`.
    pub fn encode(&self, protected: bool) -> Vec<(String, String)> {
        let service = if protected {
            ServiceType::SelfManaged.as_str()
        } else {
            self.service_type.map(|s| s.as_str()).unwrap_or_default()
        };
        let duration = match self.block_duration.trim() {
            "" => "0",
            d => d,
        };
        [
            ("name", self.name.trim()),
            ("service", service),
            ("log_path", self.log_path.trim()),
            ("lock_resource", self.lock_target.trim()),
            ("max_attempts", self.max_attempts.trim()),
            ("block_duration", duration),
            ("time_threshold", self.time_threshold.trim()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

fn placeholder(value: &str) -> &str {
    match value.trim() {
        "" => "_",
        v => v,
    }
}

fn positive(field: Field, value: &str) -> Result<u32, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FieldError::new(field, "must be a positive whole number")),
    }
}

/// Derived presentation of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Editing the admin panel service: only timing fields are editable.
    pub protected: bool,
    /// Type, log path and lock fields are shown and required.
    pub service_fields: bool,
    pub lock_kind: LockKind,
    pub lock_label: &'static str,
    pub lock_placeholder: &'static str,
    pub hint: String,
    pub save_enabled: bool,
    /// Live validation result.
    pub error: Option<FieldError>,
}

impl FormView {
    pub fn derive(fields: &FormFields, protected: bool, save_enabled: bool) -> Self {
        Self {
            protected,
            service_fields: !protected,
            lock_kind: fields.lock_kind,
            lock_label: fields.lock_kind.target_label(),
            lock_placeholder: fields.lock_kind.target_placeholder(),
            hint: fields.hint(),
            save_enabled,
            error: fields.validate(protected).err(),
        }
    }

    pub fn is_editable(&self, field: Field) -> bool {
        match field {
            Field::MaxAttempts | Field::BlockDuration | Field::TimeThreshold => true,
            Field::Name | Field::ServiceType | Field::LogPath | Field::LockTarget => {
                !self.protected
            }
            Field::Password => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: LockKind, target: &str) -> FormFields {
        FormFields {
            name: "SSH".into(),
            service_type: Some(ServiceType::Ssh),
            log_path: "/var/log/auth.log".into(),
            lock_kind: kind,
            lock_target: target.into(),
            max_attempts: "5".into(),
            block_duration: "10".into(),
            time_threshold: "3".into(),
        }
    }

    #[test]
    fn test_lock_target_rules() {
        let err = filled(LockKind::Hosts, "10").validate(false).unwrap_err();
        assert_eq!(err, FieldError::new(Field::LockTarget, "can't be a number"));

        let err = filled(LockKind::Hosts, "my daemon").validate(false).unwrap_err();
        assert_eq!(err.message, "can't have spaces");

        let err = filled(LockKind::Htaccess, "adminpanel").validate(false).unwrap_err();
        assert_eq!(err.message, "must contain '/'");

        assert!(filled(LockKind::Hosts, "sshd").validate(false).is_ok());
        assert!(filled(LockKind::Htaccess, "/srv/admin").validate(false).is_ok());
        assert!(filled(LockKind::Firewall, "2222").validate(false).is_ok());
        assert!(filled(LockKind::Firewall, "70000").validate(false).is_err());
    }

    #[test]
    fn test_numeric_fields() {
        let mut fields = filled(LockKind::Hosts, "sshd");
        fields.max_attempts = "0".into();
        assert_eq!(
            fields.validate(false).unwrap_err(),
            FieldError::new(Field::MaxAttempts, "must be a positive whole number")
        );

        let mut fields = filled(LockKind::Hosts, "sshd");
        fields.time_threshold.clear();
        assert_eq!(fields.validate(false).unwrap_err().field, Field::TimeThreshold);

        let mut fields = filled(LockKind::Hosts, "sshd");
        fields.block_duration.clear();
        assert!(fields.validate(false).is_ok());
        fields.block_duration = "soon".into();
        assert_eq!(fields.validate(false).unwrap_err().field, Field::BlockDuration);
    }

    #[test]
    fn test_protected_skips_service_fields() {
        let fields = FormFields {
            name: "Admin Panel".into(),
            max_attempts: "3".into(),
            time_threshold: "5".into(),
            ..Default::default()
        };
        assert!(fields.validate(true).is_ok());
        assert_eq!(fields.validate(false).unwrap_err().field, Field::ServiceType);

        let view = FormView::derive(&fields, true, true);
        assert!(!view.service_fields);
        assert!(view.is_editable(Field::TimeThreshold));
        assert!(!view.is_editable(Field::LockTarget));
    }

    #[test]
    fn test_hint_text() {
        let mut fields = filled(LockKind::Hosts, "sshd");
        assert_eq!(
            fields.hint(),
            "An IP with 5 failed attempts within 3 minutes will be blocked for 10 minutes"
        );
        fields.block_duration = "0".into();
        fields.max_attempts.clear();
        assert_eq!(
            fields.hint(),
            "An IP with _ failed attempts within 3 minutes will be blocked permanently"
        );
    }

    #[test]
    fn test_encode_defaults_duration_to_permanent() {
        let mut fields = filled(LockKind::Hosts, " sshd ");
        fields.block_duration.clear();
        let form = fields.encode(false);
        let get = |k: &str| form.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("service"), Some("ssh"));
        assert_eq!(get("lock_resource"), Some("sshd"));
        assert_eq!(get("block_duration"), Some("0"));
    }

    #[test]
    fn test_lock_labels_follow_kind() {
        let view = FormView::derive(&filled(LockKind::Htaccess, "/srv"), false, true);
        assert_eq!(view.lock_label, "Web folder");
        let view = FormView::derive(&filled(LockKind::Firewall, "22"), false, true);
        assert_eq!(view.lock_label, "Port");
        assert!(view.error.is_none());
    }
}
