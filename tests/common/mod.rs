// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

#![allow(dead_code)]

use accessgate::config::Settings;
use std::path::Path;

/// Settings that read credentials only from env vars unique to `prefix`,
/// so a REDIS_URL etc. in the test environment never leaks in.
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

/// Isolated settings whose file backend writes under `dir`
pub fn file_settings(prefix: &str, dir: &Path) -> Settings {
    let mut settings = isolated_settings(prefix);
    settings.backends.file.path = Some(dir.join("users.json"));
    settings
}
