// IPS Console - Remote List
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Banner;
use crate::api::{ApiRequest, Gateway};
use crate::error::ApiError;
use crate::polling::{Fetch, Refresh};

/// A backend collection fetched with one GET and replaced wholesale.
pub struct RemoteList<G, T> {
    gateway: Arc<G>,
    request: ApiRequest,
    what: &'static str,
    items: Vec<T>,
    banner: Option<Banner>,
    loaded: bool,
}

impl<G: Gateway, T: DeserializeOwned> RemoteList<G, T> {
    /// `what` names the collection in failure messages ("the service list").
    pub fn new(gateway: Arc<G>, request: ApiRequest, what: &'static str) -> Self {
        Self {
            gateway,
            request,
            what,
            items: Vec::new(),
            banner: None,
            loaded: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Whether at least one fetch succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[async_trait]
impl<G, T> Refresh for RemoteList<G, T>
where
    G: Gateway + 'static,
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Snapshot = Vec<T>;

    fn fetch(&self) -> Fetch<Vec<T>> {
        let gateway = Arc::clone(&self.gateway);
        let request = self.request.clone();
        Box::pin(async move { gateway.send(request).await.json::<Vec<T>>() })
    }

    /// Replace everything on success, keep the old items and raise a banner
    /// on failure.
    fn apply(&mut self, result: Result<Vec<T>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(items) => {
                debug!("Loaded {} entries of {}", items.len(), self.what);
                self.items = items;
                self.banner = None;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                warn!("Couldn't load {} (status {}): {}", self.what, e.status(), e);
                self.banner = Some(Banner::refresh_failed(&e, self.what));
                Err(e)
            }
        }
    }
}
