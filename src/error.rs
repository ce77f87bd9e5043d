// IPS Console - Errors
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Failure taxonomy for backend responses and local form validation.
//!
//! Every backend failure is reduced to a status code first (transport
//! failures become status `0`) and then classified here. The console never
//! retries on its own; the polling loop's next tick is the only retry.

use thiserror::Error;

/// A backend request that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400: malformed input (bad address, bad credentials format).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401: the mutation is not allowed (protected service, wrong password).
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// 403: rate limited or locked out.
    #[error("too many attempts, session locked")]
    RateLimited,

    /// 418: the target service is not running.
    #[error("service is not running")]
    NotRunning,

    /// Status 0: the request never got an HTTP answer.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// A 2xx answer whose body was not what we expected.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Any other status.
    #[error("request failed with status {0}")]
    Status(u16),
}

/// How a failure should be surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Shown next to the offending field, the form stays open.
    Inline,
    /// Modal message, nothing changes.
    Modal,
    /// Message followed by a forced session reload.
    ForceReload,
    /// Message explaining a precondition (service must be running).
    Precondition,
    /// "Server unreachable" with a reload offer.
    Unreachable,
    /// Generic failure carrying the raw status code.
    Generic,
}

impl ApiError {
    /// Classify a non-success status code and its body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = body.trim().to_string();
        match status {
            0 => ApiError::Unreachable(detail),
            400 => ApiError::BadRequest(detail),
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::RateLimited,
            418 => ApiError::NotRunning,
            other => ApiError::Status(other),
        }
    }

    /// The status code this error stands for (`0` for transport failures).
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::RateLimited => 403,
            ApiError::NotRunning => 418,
            ApiError::Unreachable(_) => 0,
            ApiError::Decode(_) => 200,
            ApiError::Status(code) => *code,
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            ApiError::BadRequest(_) => Presentation::Inline,
            ApiError::Unauthorized(_) => Presentation::Modal,
            ApiError::RateLimited => Presentation::ForceReload,
            ApiError::NotRunning => Presentation::Precondition,
            ApiError::Unreachable(_) => Presentation::Unreachable,
            ApiError::Decode(_) | ApiError::Status(_) => Presentation::Generic,
        }
    }

    /// Whether the operator should be offered (or forced into) a full reload.
    pub fn requires_reload(&self) -> bool {
        matches!(
            self.presentation(),
            Presentation::ForceReload | Presentation::Unreachable
        )
    }

    /// User-facing text for a failed `action` ("save service settings", ...).
    pub fn describe(&self, action: &str) -> String {
        match self {
            ApiError::BadRequest(detail) if !detail.is_empty() => {
                format!("Couldn't {}: {}", action, detail)
            }
            ApiError::BadRequest(_) => {
                format!("Couldn't {}: the server rejected the input", action)
            }
            ApiError::Unauthorized(_) => {
                format!("Couldn't {}: not authorized", action)
            }
            ApiError::RateLimited => {
                format!("Couldn't {}: too many attempts, reload the session", action)
            }
            ApiError::NotRunning => {
                format!("Couldn't {}: the service is not running, start it first", action)
            }
            ApiError::Unreachable(_) => {
                format!("Couldn't {}: the server is unreachable, reload to retry", action)
            }
            ApiError::Decode(_) => {
                format!("Couldn't {} (invalid response from server)", action)
            }
            ApiError::Status(code) => format!("Couldn't {} ({} error)", action, code),
        }
    }
}

/// A form field that failed local validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    ServiceType,
    LogPath,
    LockTarget,
    MaxAttempts,
    BlockDuration,
    TimeThreshold,
    Password,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::ServiceType => "Service type",
            Field::LogPath => "Log path",
            Field::LockTarget => "Lock target",
            Field::MaxAttempts => "Max attempts",
            Field::BlockDuration => "Block duration",
            Field::TimeThreshold => "Time threshold",
            Field::Password => "Password",
        }
    }
}

/// Local validation failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} {}", .field.label(), .message)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
