// IPS Console - Rule Actions
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Operator intents on services and addresses.
//!
//! # Design Principles
//!
//! - One intent, one request
//! - Every intent ends with a refresh of the affected views, successful or not
//! - Nothing is patched locally; the next fetch is the source of truth

mod coordinator;

pub use coordinator::{DeletionTarget, RuleActionCoordinator};

use crate::error::ApiError;

/// Result of an operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done { message: String },
    /// An expected refusal, e.g. deleting the admin panel service.
    Refused { error: ApiError, message: String },
    Failed { error: ApiError, message: String },
}

impl ActionOutcome {
    pub fn done(message: impl Into<String>) -> Self {
        ActionOutcome::Done {
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ActionOutcome::Done { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ActionOutcome::Done { message }
            | ActionOutcome::Refused { message, .. }
            | ActionOutcome::Failed { message, .. } => message,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ActionOutcome::Done { .. } => None,
            ActionOutcome::Refused { error, .. } | ActionOutcome::Failed { error, .. } => {
                Some(error)
            }
        }
    }
}
