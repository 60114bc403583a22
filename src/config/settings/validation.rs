// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::PathBuf;

use crate::error::{AccessError, Result};

use super::Settings;

/// Base URL and token for a REST key-value backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestCredentials {
    pub base_url: String,
    pub token: String,
}

/// Read a credential: env var first, then the inline config value.
/// Empty or whitespace-only values count as absent.
fn resolve(env_name: &str, inline: &Option<String>) -> Option<String> {
    std::env::var(env_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| inline.clone().filter(|v| !v.trim().is_empty()))
}

impl Settings {
    /// Get the networked cache connection string, checking env var first.
    pub fn get_redis_url(&self) -> Option<String> {
        let cfg = &self.backends.redis;
        resolve(&cfg.url_env, &cfg.url)
    }

    /// Get REST cache credentials. Both URL and token must be present.
    pub fn get_rest_cache_credentials(&self) -> Option<RestCredentials> {
        let cfg = &self.backends.rest_cache;
        Some(RestCredentials {
            base_url: resolve(&cfg.base_url_env, &cfg.base_url)?,
            token: resolve(&cfg.token_env, &cfg.token)?,
        })
    }

    /// Get managed KV credentials. Both URL and token must be present.
    pub fn get_managed_kv_credentials(&self) -> Option<RestCredentials> {
        let cfg = &self.backends.managed_kv;
        Some(RestCredentials {
            base_url: resolve(&cfg.base_url_env, &cfg.base_url)?,
            token: resolve(&cfg.token_env, &cfg.token)?,
        })
    }

    /// Get the file backend's data path: env var, then config, then default.
    pub fn get_data_file(&self) -> PathBuf {
        let cfg = &self.backends.file;
        std::env::var(&cfg.path_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| cfg.path.clone())
            .unwrap_or_else(Self::default_data_file)
    }

    /// Check values that would make the store unusable.
    pub fn validate(&self) -> Result<()> {
        if self.store.max_generation_attempts == 0 {
            return Err(AccessError::Config(
                "store.max_generation_attempts must be at least 1".to_string(),
            ));
        }
        if self.backends.http_timeout_secs == 0 {
            return Err(AccessError::Config(
                "backends.http_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
