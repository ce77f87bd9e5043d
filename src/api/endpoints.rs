// IPS Console - API Endpoints
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Request builders for every backend endpoint the console uses.

use super::ApiRequest;
use crate::models::ServiceId;

pub fn list_services() -> ApiRequest {
    ApiRequest::get("services")
}

pub fn get_service(id: ServiceId) -> ApiRequest {
    ApiRequest::get(format!("services/{}", id))
}

/// Create (`id == None`) or update a service. `form` is the encoded settings form.
pub fn save_service(id: Option<ServiceId>, form: Vec<(String, String)>) -> ApiRequest {
    let path = match id {
        Some(id) => format!("services/{}", id),
        None => "services".to_string(),
    };
    let mut request = ApiRequest::post(path);
    request.form = form;
    request
}

pub fn delete_service(id: ServiceId) -> ApiRequest {
    ApiRequest::delete(format!("services/{}", id))
}

pub fn toggle_service(id: ServiceId) -> ApiRequest {
    ApiRequest::post(format!("services/{}/playpause", id))
}

pub fn list_blocked(id: ServiceId) -> ApiRequest {
    ApiRequest::get(format!("services/{}/blocked", id))
}

pub fn set_blocked(id: ServiceId, address: &str, block: bool) -> ApiRequest {
    ApiRequest::post(format!("services/{}/blocked", id))
        .field("ip_address", address)
        .field("block", block)
}

pub fn list_static(id: ServiceId) -> ApiRequest {
    ApiRequest::get(format!("services/{}/static", id))
}

/// `block == true` blacklists, `false` whitelists.
pub fn set_static(id: ServiceId, address: &str, block: bool) -> ApiRequest {
    ApiRequest::post(format!("services/{}/static", id))
        .field("ip_address", address)
        .field("block", block)
}

pub fn remove_static(id: ServiceId, address: &str) -> ApiRequest {
    ApiRequest::delete(format!("services/{}/static", id)).field("ip_address", address)
}

pub fn change_password(old: &str, new: &str) -> ApiRequest {
    ApiRequest::post("password")
        .field("old_password", old)
        .field("new_password", new)
}
