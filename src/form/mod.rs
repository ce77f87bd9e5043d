// IPS Console - Service Settings Form
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Create/edit form for service settings.

mod defaults;
mod fields;
mod machine;

use thiserror::Error;

use crate::error::{ApiError, FieldError};

pub use defaults::recommended;
pub use fields::{FormFields, FormView};
pub use machine::{ConfigForm, SAVED_MESSAGE};

/// Why a form operation did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("the form is not open for editing")]
    NotEditing,

    /// The response belongs to a request the form has moved on from.
    #[error("discarded a response for a form that is no longer open")]
    Stale,

    #[error(transparent)]
    Invalid(#[from] FieldError),

    #[error("{message}")]
    Backend { error: ApiError, message: String },
}
