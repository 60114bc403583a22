// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for accessgate
//!
//! Handles loading and saving settings from ~/.accessgate/settings.json.
//! Backend credentials are normally supplied through environment variables;
//! the settings file only names which variables to read, with optional
//! inline fallbacks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod io;
mod validation;

pub use validation::RestCredentials;

/// Main settings structure, stored in ~/.accessgate/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Storage backend configurations
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Code store behavior
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for every storage backend tier
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendsConfig {
    /// Networked cache (Redis protocol)
    #[serde(default)]
    pub redis: RedisConfig,

    /// REST cache (Upstash-compatible REST API)
    #[serde(default)]
    pub rest_cache: RestCacheConfig,

    /// Managed key-value service
    #[serde(default)]
    pub managed_kv: ManagedKvConfig,

    /// Local JSON file fallback
    #[serde(default)]
    pub file: FileConfig,

    /// Request timeout for REST backends, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Networked cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection string (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable name for the connection string
    #[serde(default = "default_redis_url_env")]
    pub url_env: String,
}

/// REST cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestCacheConfig {
    /// Base URL (if stored directly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable name for the base URL
    #[serde(default = "default_rest_cache_url_env")]
    pub base_url_env: String,

    /// Access token (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name for the access token
    #[serde(default = "default_rest_cache_token_env")]
    pub token_env: String,
}

/// Managed key-value service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedKvConfig {
    /// Base URL (if stored directly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable name for the base URL
    #[serde(default = "default_managed_kv_url_env")]
    pub base_url_env: String,

    /// Access token (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name for the access token
    #[serde(default = "default_managed_kv_token_env")]
    pub token_env: String,
}

/// Local file backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path of the JSON data file (None = ~/.accessgate/users.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Environment variable that overrides the path
    #[serde(default = "default_file_path_env")]
    pub path_env: String,
}

/// How the store treats a backend read that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadFailurePolicy {
    /// Treat the collection as empty (every code invalid) and log a warning
    #[default]
    Degrade,
    /// Surface the failure to the caller as an error
    Propagate,
}

/// Code store behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// What to do when the active backend cannot be read
    #[serde(default)]
    pub read_failure_policy: ReadFailurePolicy,

    /// How many fresh codes `create` tries before giving up on collisions
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: default_redis_url_env(),
        }
    }
}

impl Default for RestCacheConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_url_env: default_rest_cache_url_env(),
            token: None,
            token_env: default_rest_cache_token_env(),
        }
    }
}

impl Default for ManagedKvConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_url_env: default_managed_kv_url_env(),
            token: None,
            token_env: default_managed_kv_token_env(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: None,
            path_env: default_file_path_env(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            read_failure_policy: ReadFailurePolicy::default(),
            max_generation_attempts: default_max_generation_attempts(),
        }
    }
}

fn default_redis_url_env() -> String {
    "REDIS_URL".to_string()
}

fn default_rest_cache_url_env() -> String {
    "UPSTASH_REDIS_REST_URL".to_string()
}

fn default_rest_cache_token_env() -> String {
    "UPSTASH_REDIS_REST_TOKEN".to_string()
}

fn default_managed_kv_url_env() -> String {
    "KV_REST_API_URL".to_string()
}

fn default_managed_kv_token_env() -> String {
    "KV_REST_API_TOKEN".to_string()
}

fn default_file_path_env() -> String {
    "ACCESSGATE_DATA_FILE".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_max_generation_attempts() -> u32 {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_env_names() {
        let settings = Settings::default();
        assert_eq!(settings.backends.redis.url_env, "REDIS_URL");
        assert_eq!(
            settings.backends.rest_cache.base_url_env,
            "UPSTASH_REDIS_REST_URL"
        );
        assert_eq!(
            settings.backends.rest_cache.token_env,
            "UPSTASH_REDIS_REST_TOKEN"
        );
        assert_eq!(settings.backends.managed_kv.base_url_env, "KV_REST_API_URL");
        assert_eq!(settings.backends.managed_kv.token_env, "KV_REST_API_TOKEN");
        assert_eq!(settings.backends.file.path_env, "ACCESSGATE_DATA_FILE");
    }

    #[test]
    fn test_settings_default_store() {
        let settings = Settings::default();
        assert_eq!(
            settings.store.read_failure_policy,
            ReadFailurePolicy::Degrade
        );
        assert_eq!(settings.store.max_generation_attempts, 16);
        assert_eq!(settings.backends.http_timeout_secs, 10);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let json = r#"{
            "backends": { "redis": { "url": "redis://cache:6379" } },
            "store": { "read_failure_policy": "propagate" }
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings.backends.redis.url.as_deref(),
            Some("redis://cache:6379")
        );
        assert_eq!(settings.backends.redis.url_env, "REDIS_URL");
        assert_eq!(
            settings.store.read_failure_policy,
            ReadFailurePolicy::Propagate
        );
        assert_eq!(settings.store.max_generation_attempts, 16);
    }

    #[test]
    fn test_settings_deserialize_empty_object() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert!(settings.backends.file.path.is_none());
        assert_eq!(settings.backends.managed_kv.token_env, "KV_REST_API_TOKEN");
    }

    #[test]
    fn test_inline_secrets_skipped_when_absent() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("\"token\""));
        assert!(!json.contains("\"url\""));
    }
}
