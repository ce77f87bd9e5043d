// IPS Console - Test Backend
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! In-memory backend used by unit tests.
//!
//! It keeps just enough state to answer every endpoint the console uses,
//! records each request, and can be told to answer the next matching request
//! with a canned response instead.

use std::collections::{BTreeMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{ApiRequest, ApiResponse, Gateway, Method};
use crate::models::ServiceType;

#[derive(Debug, Clone)]
pub struct FakeService {
    pub name: String,
    pub service: ServiceType,
    pub stopped: bool,
    pub log_path: String,
    pub lock_resource: String,
    pub max_attempts: u32,
    pub block_duration: u32,
    pub time_threshold: u32,
}

impl FakeService {
    pub fn new(name: &str, service: ServiceType, lock_resource: &str) -> Self {
        Self {
            name: name.to_string(),
            service,
            stopped: false,
            log_path: "/var/log/auth.log".to_string(),
            lock_resource: lock_resource.to_string(),
            max_attempts: 5,
            block_duration: 5,
            time_threshold: 5,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    services: BTreeMap<u64, FakeService>,
    next_id: u64,
    /// (service, address, active)
    blocked: Vec<(u64, String, bool)>,
    /// (service, address, blacklisted)
    rules: Vec<(u64, String, bool)>,
    password: String,
    requests: Vec<ApiRequest>,
    overrides: VecDeque<(Method, String, ApiResponse)>,
    fixed: Vec<(Method, String, ApiResponse)>,
}

#[derive(Debug)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    /// A backend holding only the protected admin-panel service (id 1).
    pub fn new() -> Self {
        let backend = Self {
            state: Mutex::new(State {
                next_id: 1,
                password: "admin".to_string(),
                ..Default::default()
            }),
        };
        backend.add_service(FakeService::new("Admin Panel", ServiceType::SelfManaged, ""));
        backend
    }

    pub fn add_service(&self, service: FakeService) -> u64 {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.services.insert(id, service);
        id
    }

    pub fn service(&self, id: u64) -> Option<FakeService> {
        self.lock().services.get(&id).cloned()
    }

    pub fn set_stopped(&self, id: u64, stopped: bool) {
        if let Some(s) = self.lock().services.get_mut(&id) {
            s.stopped = stopped;
        }
    }

    /// Simulate the detection engine blocking an address.
    pub fn detect(&self, id: u64, address: &str) {
        self.lock().blocked.push((id, address.to_string(), true));
    }

    /// Answer the next `method path` request with `response`.
    pub fn respond_next(&self, method: Method, path: &str, response: ApiResponse) {
        self.lock()
            .overrides
            .push_back((method, path.to_string(), response));
    }

    /// Answer every `method path` request with `response` from now on.
    pub fn respond_always(&self, method: Method, path: &str, response: ApiResponse) {
        self.lock().fixed.push((method, path.to_string(), response));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(state: &mut State, request: &ApiRequest) -> ApiResponse {
        let parts: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        match (request.method, parts.as_slice()) {
            (Method::Get, ["services"]) => {
                let list: Vec<_> = state
                    .services
                    .iter()
                    .map(|(id, s)| {
                        let now = state
                            .blocked
                            .iter()
                            .filter(|(sid, _, active)| sid == id && *active)
                            .count();
                        let last_blocked = if now > 0 { Some("just now") } else { None };
                        json!({
                            "id": id,
                            "name": s.name,
                            "service": s.service.as_str(),
                            "stopped": s.stopped,
                            "blocked_now": now,
                            "blocked_24h": now,
                            "last_blocked": last_blocked,
                        })
                    })
                    .collect();
                ApiResponse::ok(json!(list).to_string())
            }
            (Method::Post, ["services"]) => {
                let Some(service) = Self::service_from_form(request, None) else {
                    return ApiResponse::new(400, "invalid settings");
                };
                let id = state.next_id;
                state.next_id += 1;
                state.services.insert(id, service);
                ApiResponse::ok(json!({ "id": id }).to_string())
            }
            (method, ["services", id, rest @ ..]) => {
                let Ok(id) = id.parse::<u64>() else {
                    return ApiResponse::new(404, "");
                };
                let Some(service) = state.services.get(&id).cloned() else {
                    return ApiResponse::new(404, "");
                };
                Self::handle_service(state, id, service, method, rest, request)
            }
            (Method::Post, ["password"]) => {
                let old = request.value("old_password").unwrap_or_default();
                let new = request.value("new_password").unwrap_or_default();
                if new.is_empty() {
                    ApiResponse::new(400, "empty password")
                } else if old != state.password {
                    ApiResponse::new(401, "wrong password")
                } else {
                    state.password = new.to_string();
                    ApiResponse::ok("")
                }
            }
            _ => ApiResponse::new(404, ""),
        }
    }

    fn handle_service(
        state: &mut State,
        id: u64,
        service: FakeService,
        method: Method,
        rest: &[&str],
        request: &ApiRequest,
    ) -> ApiResponse {
        let address = request
            .value("ip_address")
            .map(|a| a.trim().to_lowercase())
            .unwrap_or_default();
        let block = request.value("block") == Some("true");

        match (method, rest) {
            (Method::Get, []) => {
                let lock_resource = if service.service.is_protected() {
                    None
                } else {
                    Some(service.lock_resource.clone())
                };
                ApiResponse::ok(
                    json!({
                        "id": id,
                        "name": service.name,
                        "service": service.service.as_str(),
                        "time_threshold": service.time_threshold,
                        "max_attempts": service.max_attempts,
                        "block_duration": service.block_duration,
                        "log_path": service.log_path,
                        "lock_resource": lock_resource,
                        "stopped": service.stopped,
                    })
                    .to_string(),
                )
            }
            (Method::Post, []) => {
                let Some(updated) = Self::service_from_form(request, Some(&service)) else {
                    return ApiResponse::new(400, "invalid settings");
                };
                state.services.insert(id, updated);
                ApiResponse::ok("")
            }
            (Method::Delete, []) => {
                if service.service.is_protected() {
                    return ApiResponse::new(401, "protected service");
                }
                state.services.remove(&id);
                state.blocked.retain(|(sid, _, _)| *sid != id);
                state.rules.retain(|(sid, _, _)| *sid != id);
                ApiResponse::ok("")
            }
            (Method::Post, ["playpause"]) => {
                if let Some(s) = state.services.get_mut(&id) {
                    s.stopped = !s.stopped;
                }
                ApiResponse::ok("")
            }
            (Method::Get, ["blocked"]) => {
                let mut list: Vec<_> = state
                    .blocked
                    .iter()
                    .filter(|(sid, _, _)| *sid == id)
                    .map(|(_, ip, active)| {
                        json!({ "ip_address": ip, "blocked_at": "2026-03-01 12:00:00", "active": active })
                    })
                    .collect();
                list.extend(
                    state
                        .rules
                        .iter()
                        .filter(|(sid, _, blacklisted)| *sid == id && *blacklisted)
                        .map(|(_, ip, _)| {
                            json!({ "ip_address": ip, "blocked_at": "Blacklisted", "active": true })
                        }),
                );
                ApiResponse::ok(json!(list).to_string())
            }
            (Method::Post, ["blocked"]) => {
                if service.stopped {
                    return ApiResponse::new(418, "service not running");
                }
                if address.parse::<IpAddr>().is_err() {
                    return ApiResponse::new(400, "invalid address");
                }
                if state.rules.iter().any(|(sid, ip, _)| *sid == id && *ip == address) {
                    return ApiResponse::ok("");
                }
                let existing = state
                    .blocked
                    .iter()
                    .position(|(sid, ip, active)| *sid == id && *ip == address && *active);
                match (existing, block) {
                    (Some(_), true) | (None, false) => {}
                    (None, true) => state.blocked.push((id, address, true)),
                    (Some(i), false) => state.blocked[i].2 = false,
                }
                ApiResponse::ok("")
            }
            (Method::Get, ["static"]) => {
                let list: Vec<_> = state
                    .rules
                    .iter()
                    .filter(|(sid, _, _)| *sid == id)
                    .map(|(_, ip, blocked)| {
                        json!({ "ip_address": ip, "added_at": "2026-03-01 12:00:00", "blocked": blocked })
                    })
                    .collect();
                ApiResponse::ok(json!(list).to_string())
            }
            (Method::Post, ["static"]) => {
                if address.parse::<IpAddr>().is_err() {
                    return ApiResponse::new(400, "invalid address");
                }
                for entry in state
                    .blocked
                    .iter_mut()
                    .filter(|(sid, ip, _)| *sid == id && *ip == address)
                {
                    entry.2 = false;
                }
                state.rules.retain(|(sid, ip, _)| !(*sid == id && *ip == address));
                state.rules.push((id, address, block));
                ApiResponse::ok("")
            }
            (Method::Delete, ["static"]) => {
                state.rules.retain(|(sid, ip, _)| !(*sid == id && *ip == address));
                ApiResponse::ok("")
            }
            _ => ApiResponse::new(404, ""),
        }
    }

    fn service_from_form(request: &ApiRequest, current: Option<&FakeService>) -> Option<FakeService> {
        let number = |key: &str| -> Option<u32> { request.value(key)?.parse().ok() };
        let service = match current {
            Some(c) if c.service.is_protected() => ServiceType::SelfManaged,
            _ => request.value("service")?.parse().ok()?,
        };
        Some(FakeService {
            name: request.value("name")?.to_string(),
            service,
            stopped: current.map(|c| c.stopped).unwrap_or(false),
            log_path: request.value("log_path").unwrap_or_default().to_string(),
            lock_resource: request.value("lock_resource").unwrap_or_default().to_string(),
            max_attempts: number("max_attempts")?,
            block_duration: number("block_duration").unwrap_or(0),
            time_threshold: number("time_threshold")?,
        })
    }
}

#[async_trait]
impl Gateway for FakeBackend {
    async fn send(&self, request: ApiRequest) -> ApiResponse {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if let Some(pos) = state
            .overrides
            .iter()
            .position(|(m, p, _)| *m == request.method && *p == request.path)
        {
            if let Some((_, _, response)) = state.overrides.remove(pos) {
                return response;
            }
        }
        if let Some((_, _, response)) = state
            .fixed
            .iter()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
        {
            return response.clone();
        }

        Self::handle(&mut state, &request)
    }
}
