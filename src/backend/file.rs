// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Local JSON file backend
//!
//! The fallback tier, always available. Write failures are logged and
//! swallowed because the deployment filesystem may be read-only.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{decode_collection, CodeBackend};
use crate::error::Result;
use crate::store::AccessCode;

/// Stores the collection as a pretty-printed JSON array in one file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write through a sibling temp file and rename it into place.
    async fn persist(&self, codes: &[AccessCode]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(codes)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl CodeBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<Vec<AccessCode>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode_collection(&content)
    }

    async fn write_all(&self, codes: &[AccessCode]) -> Result<()> {
        match self.persist(codes).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = codes.len(), "wrote access codes");
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not write access codes file; change not persisted"
                );
            }
        }
        Ok(())
    }
}
