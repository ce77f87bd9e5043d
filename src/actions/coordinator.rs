// IPS Console - Rule Action Coordinator
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ActionOutcome;
use crate::api::{endpoints, ApiRequest, Gateway};
use crate::error::{ApiError, Field, FieldError};
use crate::models::{normalize_address, AddressStatus, RuleKind, ServiceId};
use crate::polling::RefreshHandle;

pub const DELETED_MESSAGE: &str = "Deleted successfully!";

/// What a confirmed deletion removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionTarget {
    Service(ServiceId),
    Rule { service: ServiceId, address: String },
}

/// Turns operator intents into backend requests.
pub struct RuleActionCoordinator<G> {
    gateway: Arc<G>,
    refresh: Vec<RefreshHandle>,
    /// At most one deletion awaits confirmation.
    pending_deletion: Option<DeletionTarget>,
}

impl<G: Gateway> RuleActionCoordinator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            refresh: Vec::new(),
            pending_deletion: None,
        }
    }

    /// Refresh `handle`'s view after every action.
    pub fn with_refresh(mut self, handle: RefreshHandle) -> Self {
        self.refresh.push(handle);
        self
    }

    /// Dynamic block/unblock (`static_rule == false`), or blacklist/whitelist
    /// (`static_rule == true`, `block` selects blacklist).
    pub async fn block_or_unblock(
        &self,
        service: ServiceId,
        address: &str,
        block: bool,
        static_rule: bool,
    ) -> ActionOutcome {
        let address = normalize_address(address);
        if static_rule {
            let kind = RuleKind::from_blocked(block);
            let verb = match kind {
                RuleKind::Blacklist => "blacklist",
                RuleKind::Whitelist => "whitelist",
            };
            self.run(
                endpoints::set_static(service, &address, block),
                &format!("IP address {}ed successfully", verb),
                &format!("{} IP", verb),
            )
            .await
        } else {
            let verb = if block { "block" } else { "unblock" };
            self.run(
                endpoints::set_blocked(service, &address, block),
                &format!("IP address {}ed successfully", verb),
                &format!("{} IP", verb),
            )
            .await
        }
    }

    pub async fn remove_static_rule(&self, service: ServiceId, address: &str) -> ActionOutcome {
        let address = normalize_address(address);
        self.run(
            endpoints::remove_static(service, &address),
            "Static rule removed successfully",
            "remove the static rule",
        )
        .await
    }

    /// Release an address given its current status. Blacklisted addresses
    /// are released by removing their rule; `None` when there is nothing to
    /// release.
    pub async fn unblock(
        &self,
        service: ServiceId,
        address: &str,
        status: AddressStatus,
    ) -> Option<ActionOutcome> {
        match status {
            AddressStatus::Blocked => Some(self.block_or_unblock(service, address, false, false).await),
            AddressStatus::Blacklisted => Some(self.remove_static_rule(service, address).await),
            AddressStatus::Whitelisted | AddressStatus::Unblocked | AddressStatus::Unknown => {
                debug!("{} is not blocked ({})", address, status.label());
                None
            }
        }
    }

    pub async fn toggle_run_state(&self, service: ServiceId) -> ActionOutcome {
        self.run(
            endpoints::toggle_service(service),
            "Service state changed successfully",
            "toggle service's state",
        )
        .await
    }

    /// Delete a service. The backend refuses the admin panel service with
    /// 401, which is reported as [`ActionOutcome::Refused`].
    pub async fn delete_service(&self, service: ServiceId) -> ActionOutcome {
        match self
            .run(endpoints::delete_service(service), DELETED_MESSAGE, "delete")
            .await
        {
            ActionOutcome::Failed {
                error: error @ ApiError::Unauthorized(_),
                ..
            } => {
                info!("Service {} is protected and was not deleted", service);
                ActionOutcome::Refused {
                    error,
                    message: "The admin panel service can't be deleted".to_string(),
                }
            }
            other => other,
        }
    }

    /// Remember what to delete once confirmed, replacing any earlier target.
    pub fn set_for_deletion(&mut self, target: DeletionTarget) {
        if let Some(previous) = self.pending_deletion.replace(target) {
            debug!("Abandoning pending deletion of {:?}", previous);
        }
    }

    pub fn pending_deletion(&self) -> Option<&DeletionTarget> {
        self.pending_deletion.as_ref()
    }

    pub fn cancel_deletion(&mut self) {
        self.pending_deletion = None;
    }

    /// Delete the pending target. `None` if nothing was pending.
    pub async fn confirm_deletion(&mut self) -> Option<ActionOutcome> {
        let target = self.pending_deletion.take()?;
        let outcome = match target {
            DeletionTarget::Service(id) => self.delete_service(id).await,
            DeletionTarget::Rule { service, address } => {
                self.remove_static_rule(service, &address).await
            }
        };
        Some(outcome)
    }

    /// Change the administrator password. Mismatched or empty new passwords
    /// are rejected locally.
    pub async fn change_password(
        &self,
        old: &str,
        new: &str,
        repeat: &str,
    ) -> Result<ActionOutcome, FieldError> {
        if new.is_empty() {
            return Err(FieldError::new(Field::Password, "can't be empty"));
        }
        if new != repeat {
            return Err(FieldError::new(Field::Password, "and its repetition don't match"));
        }

        let outcome = match self
            .gateway
            .send(endpoints::change_password(old, new))
            .await
            .into_result()
        {
            Ok(_) => {
                info!("Administrator password changed");
                ActionOutcome::done("Password changed successfully")
            }
            Err(error @ ApiError::Unauthorized(_)) => ActionOutcome::Failed {
                error,
                message: "Couldn't change the password: the current password is wrong"
                    .to_string(),
            },
            Err(error) => {
                let message = error.describe("change the password");
                warn!("{}", message);
                ActionOutcome::Failed { error, message }
            }
        };
        Ok(outcome)
    }

    async fn run(&self, request: ApiRequest, success: &str, action: &str) -> ActionOutcome {
        debug!("{} {}", request.method, request.path);
        let outcome = match self.gateway.send(request).await.into_result() {
            Ok(_) => {
                info!("{}", success);
                ActionOutcome::done(success)
            }
            Err(error) => {
                let message = error.describe(action);
                warn!("{}", message);
                ActionOutcome::Failed { error, message }
            }
        };
        self.refresh_views();
        outcome
    }

    fn refresh_views(&self) {
        for handle in &self.refresh {
            handle.trigger();
        }
    }
}
