// IPS Console - Service Form State Machine
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! `Closed -> Loading -> Editing -> Submitting -> Closed`.
//!
//! Every request the form issues carries a [`Ticket`]. Starting a new target
//! or closing the form invalidates outstanding tickets, so a late response
//! for a form the operator already left is discarded instead of applied.

use tracing::{debug, info, warn};

use super::{recommended, FormError, FormFields, FormView};
use crate::api::{endpoints, ApiRequest, Gateway};
use crate::error::{ApiError, Field, FieldError};
use crate::models::{LockKind, ServiceId, ServiceRecord, ServiceType};

pub const SAVED_MESSAGE: &str = "Saved successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Loading(ServiceId),
    Editing,
    Submitting,
}

/// Identifies the request a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct ConfigForm {
    state: FormState,
    /// Service being edited; `None` while creating.
    target: Option<ServiceId>,
    protected: bool,
    fields: FormFields,
    generation: u64,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigForm {
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
            target: None,
            protected: false,
            fields: FormFields::default(),
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn target(&self) -> Option<ServiceId> {
        self.target
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Derived presentation, `None` unless the form shows editable fields.
    pub fn view(&self) -> Option<FormView> {
        match self.state {
            FormState::Editing => Some(FormView::derive(&self.fields, self.protected, true)),
            FormState::Submitting => Some(FormView::derive(&self.fields, self.protected, false)),
            FormState::Closed | FormState::Loading(_) => None,
        }
    }

    /// Open an empty form for a new service.
    pub fn open_for_create(&mut self) {
        self.start_target(None);
        self.state = FormState::Editing;
        debug!("Service form opened for a new service");
    }

    /// First half of [`open_for_edit`](Self::open_for_edit).
    pub fn begin_edit(&mut self, id: ServiceId) -> (Ticket, ApiRequest) {
        self.start_target(Some(id));
        self.state = FormState::Loading(id);
        debug!("Loading settings of service {}", id);
        (Ticket(self.generation), endpoints::get_service(id))
    }

    /// Second half of [`open_for_edit`](Self::open_for_edit).
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<ServiceRecord, ApiError>,
    ) -> Result<(), FormError> {
        let FormState::Loading(id) = self.state else {
            return self.discard(ticket);
        };
        if ticket.0 != self.generation {
            return self.discard(ticket);
        }

        match result {
            Ok(record) => {
                if record.id != id {
                    warn!("Asked for service {} but got {}", id, record.id);
                }
                self.protected = record.service.is_protected();
                self.fields = FormFields::from_record(&record);
                self.state = FormState::Editing;
                Ok(())
            }
            Err(error) => {
                self.close();
                let message = error.describe("load service settings");
                warn!("{}", message);
                Err(FormError::Backend { error, message })
            }
        }
    }

    /// Load service `id` and open it for editing.
    pub async fn open_for_edit<G: Gateway + ?Sized>(
        &mut self,
        gateway: &G,
        id: ServiceId,
    ) -> Result<(), FormError> {
        let (ticket, request) = self.begin_edit(id);
        let result = gateway.send(request).await.json::<ServiceRecord>();
        self.finish_load(ticket, result)
    }

    /// Abandon the current target. Outstanding responses become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = FormState::Closed;
        self.target = None;
        self.protected = false;
    }

    /// Edit a free-text field, or the service type by its wire name.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        self.ensure_editable(field)?;
        if field == Field::ServiceType {
            let service: ServiceType = value
                .parse()
                .map_err(|e: String| FieldError::new(field, e))?;
            return self.set_service_type(service);
        }
        match self.fields.text_mut(field) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(FieldError::new(field, "is not part of the service form")),
        }
    }

    pub fn set_service_type(&mut self, service: ServiceType) -> Result<(), FieldError> {
        self.ensure_editable(Field::ServiceType)?;
        if service.is_protected() {
            return Err(FieldError::new(Field::ServiceType, "can't be chosen"));
        }
        self.fields.service_type = Some(service);
        Ok(())
    }

    pub fn set_lock_kind(&mut self, kind: LockKind) -> Result<(), FieldError> {
        self.ensure_editable(Field::LockTarget)?;
        self.fields.lock_kind = kind;
        Ok(())
    }

    /// Fill log path and lock with the recommended settings of the selected
    /// type. Returns `false` when there is nothing to apply.
    pub fn apply_recommended_defaults(&mut self) -> bool {
        if self.state != FormState::Editing || self.protected {
            return false;
        }
        let Some(settings) = self.fields.service_type.and_then(recommended) else {
            return false;
        };
        self.fields.log_path = settings.log_path.to_string();
        self.fields.lock_kind = settings.lock_kind;
        self.fields.lock_target = settings.lock_target.to_string();
        true
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        self.fields.validate(self.protected)
    }

    /// Validate and move to `Submitting`. Invalid input never leaves the
    /// form and never produces a request.
    pub fn begin_submit(&mut self) -> Result<(Ticket, ApiRequest), FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        self.validate()?;

        self.generation += 1;
        self.state = FormState::Submitting;
        let request = endpoints::save_service(self.target, self.fields.encode(self.protected));
        Ok((Ticket(self.generation), request))
    }

    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: Result<(), ApiError>,
    ) -> Result<(), FormError> {
        if self.state != FormState::Submitting || ticket.0 != self.generation {
            return self.discard(ticket);
        }
        match result {
            Ok(()) => {
                info!("Saved settings of {}", self.describe_target());
                self.close();
                Ok(())
            }
            Err(error) => {
                // Keep what the operator typed.
                self.state = FormState::Editing;
                let message = error.describe("save service settings");
                warn!("{}", message);
                Err(FormError::Backend { error, message })
            }
        }
    }

    /// Validate, send and apply the outcome.
    pub async fn submit<G: Gateway + ?Sized>(&mut self, gateway: &G) -> Result<(), FormError> {
        let (ticket, request) = self.begin_submit()?;
        let result = gateway.send(request).await.into_result().map(|_| ());
        self.finish_submit(ticket, result)
    }

    fn start_target(&mut self, target: Option<ServiceId>) {
        if self.state != FormState::Closed {
            debug!("Abandoning {}", self.describe_target());
        }
        self.generation += 1;
        self.target = target;
        self.protected = false;
        self.fields = FormFields::default();
    }

    fn ensure_editable(&self, field: Field) -> Result<(), FieldError> {
        match self.view() {
            Some(view) if view.save_enabled && view.is_editable(field) => Ok(()),
            Some(view) if view.save_enabled => {
                Err(FieldError::new(field, "can't be changed for this service"))
            }
            _ => Err(FieldError::new(field, "can't be changed right now")),
        }
    }

    fn discard(&self, ticket: Ticket) -> Result<(), FormError> {
        debug!(
            "Discarding stale response (ticket {}, current {})",
            ticket.0, self.generation
        );
        Err(FormError::Stale)
    }

    fn describe_target(&self) -> String {
        match self.target {
            Some(id) => format!("service {}", id),
            None => "new service".to_string(),
        }
    }
}
