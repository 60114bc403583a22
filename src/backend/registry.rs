// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Backend registry
//!
//! Owns the settings and one lazily-created handle per networked backend.
//! The active backend is resolved from the environment on every call, so a
//! credential change takes effect on the next operation. A handle, once
//! created, keeps the credentials it was created with for the registry's
//! lifetime.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::{
    resolve_backend, BackendKind, BackendSelection, CodeBackend, FileBackend, RedisBackend,
    RestKvBackend,
};
use crate::config::Settings;
use crate::error::Result;

pub struct BackendRegistry {
    settings: Settings,
    injected: Option<Arc<dyn CodeBackend>>,
    redis: OnceLock<Arc<RedisBackend>>,
    rest_cache: OnceLock<Arc<RestKvBackend>>,
    managed_kv: OnceLock<Arc<RestKvBackend>>,
}

impl BackendRegistry {
    /// Create a registry that selects backends from `settings`
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            injected: None,
            redis: OnceLock::new(),
            rest_cache: OnceLock::new(),
            managed_kv: OnceLock::new(),
        }
    }

    /// Create a registry that always uses `backend`, bypassing selection
    pub fn with_backend(backend: Arc<dyn CodeBackend>) -> Self {
        Self::new(Settings::default()).inject(backend)
    }

    /// Use `backend` for every call while keeping these settings
    pub fn inject(mut self, backend: Arc<dyn CodeBackend>) -> Self {
        self.injected = Some(backend);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The tier the current configuration selects. Ignores an injected backend.
    pub fn selected_kind(&self) -> BackendKind {
        resolve_backend(&self.settings).kind()
    }

    /// The backend to use for this call
    pub fn active(&self) -> Result<Arc<dyn CodeBackend>> {
        if let Some(backend) = &self.injected {
            return Ok(Arc::clone(backend));
        }

        let selection = resolve_backend(&self.settings);
        tracing::debug!(backend = selection.kind().label(), "resolved storage backend");

        let timeout = Duration::from_secs(self.settings.backends.http_timeout_secs);
        let backend: Arc<dyn CodeBackend> = match selection {
            BackendSelection::Redis { url } => memoized(&self.redis, || Ok(RedisBackend::new(url)))?,
            BackendSelection::RestCache(creds) => memoized(&self.rest_cache, || {
                RestKvBackend::new("rest-cache", creds, timeout)
            })?,
            BackendSelection::ManagedKv(creds) => memoized(&self.managed_kv, || {
                RestKvBackend::new("managed-kv", creds, timeout)
            })?,
            BackendSelection::File { path } => Arc::new(FileBackend::new(path)),
        };
        Ok(backend)
    }
}

/// Return the handle in `cell`, creating it first if needed. A failed
/// creation leaves the cell empty.
fn memoized<T>(cell: &OnceLock<Arc<T>>, create: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
    if let Some(handle) = cell.get() {
        return Ok(Arc::clone(handle));
    }
    let handle = Arc::new(create()?);
    Ok(Arc::clone(cell.get_or_init(|| handle)))
}
