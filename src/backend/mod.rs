// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Storage backends for the access-code collection
//!
//! Every backend stores the whole collection as one JSON array under a
//! single key (or file) and exposes the same narrow contract: read it all,
//! write it all. There is no per-record update at this layer.
//!
//! Which backend is active is decided by [`select_backend`] from the
//! configured credentials, in priority order:
//! networked cache > REST cache > managed KV > local file.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

use crate::config::{RestCredentials, Settings};
use crate::error::{BackendError, Result};
use crate::store::AccessCode;

pub mod file;
pub mod memory;
pub mod redis_cache;
pub mod registry;
pub mod rest_kv;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use redis_cache::RedisBackend;
pub use registry::BackendRegistry;
pub use rest_kv::RestKvBackend;

/// Key under which the key-value backends store the collection
pub const STORAGE_KEY: &str = "users";

/// Contract shared by every storage medium
#[async_trait]
pub trait CodeBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Read the full collection, reporting transport or payload failures.
    async fn fetch(&self) -> Result<Vec<AccessCode>>;

    /// Read the full collection, degrading to empty on any failure.
    async fn read_all(&self) -> Vec<AccessCode> {
        match self.fetch().await {
            Ok(codes) => codes,
            Err(e) => {
                tracing::warn!(
                    backend = self.name(),
                    error = %e,
                    "access-code read failed; treating collection as empty"
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the full collection.
    async fn write_all(&self, codes: &[AccessCode]) -> Result<()>;
}

/// The storage tiers, in selection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Redis,
    RestCache,
    ManagedKv,
    File,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Redis => "redis",
            BackendKind::RestCache => "rest-cache",
            BackendKind::ManagedKv => "managed-kv",
            BackendKind::File => "file",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selected tier together with the credentials that selected it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    Redis { url: String },
    RestCache(RestCredentials),
    ManagedKv(RestCredentials),
    File { path: PathBuf },
}

impl BackendSelection {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendSelection::Redis { .. } => BackendKind::Redis,
            BackendSelection::RestCache(_) => BackendKind::RestCache,
            BackendSelection::ManagedKv(_) => BackendKind::ManagedKv,
            BackendSelection::File { .. } => BackendKind::File,
        }
    }
}

/// Resolve the first tier whose credentials are fully present.
///
/// Incomplete credentials never select a tier; evaluation falls through.
/// Reads the environment on every call.
pub fn resolve_backend(settings: &Settings) -> BackendSelection {
    if let Some(url) = settings.get_redis_url() {
        return BackendSelection::Redis { url };
    }
    if let Some(creds) = settings.get_rest_cache_credentials() {
        return BackendSelection::RestCache(creds);
    }
    if let Some(creds) = settings.get_managed_kv_credentials() {
        return BackendSelection::ManagedKv(creds);
    }
    BackendSelection::File {
        path: settings.get_data_file(),
    }
}

/// Which tier is active for the current configuration.
pub fn select_backend(settings: &Settings) -> BackendKind {
    resolve_backend(settings).kind()
}

pub(crate) fn decode_collection(payload: &str) -> Result<Vec<AccessCode>> {
    serde_json::from_str(payload).map_err(|e| BackendError::Payload(e.to_string()).into())
}

pub(crate) fn encode_collection(codes: &[AccessCode]) -> Result<String> {
    Ok(serde_json::to_string(codes)?)
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::config::Settings;

    /// Settings whose credential env vars carry a unique prefix, so tests
    /// never see the real REDIS_URL etc. or each other's variables.
    pub fn isolated_settings(prefix: &str) -> Settings {
        let mut settings = Settings::default();
        let b = &mut settings.backends;
        b.redis.url_env = format!("{prefix}_REDIS_URL");
        b.rest_cache.base_url_env = format!("{prefix}_REST_URL");
        b.rest_cache.token_env = format!("{prefix}_REST_TOKEN");
        b.managed_kv.base_url_env = format!("{prefix}_KV_URL");
        b.managed_kv.token_env = format!("{prefix}_KV_TOKEN");
        b.file.path_env = format!("{prefix}_DATA_FILE");
        settings
    }
}
