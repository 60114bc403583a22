// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! In-process backend
//!
//! Never chosen by configuration; injected through
//! [`BackendRegistry::with_backend`](super::BackendRegistry::with_backend)
//! for tests and embedding. Data is lost when the process exits.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::CodeBackend;
use crate::error::Result;
use crate::store::AccessCode;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    codes: RwLock<Vec<AccessCode>>,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing collection
    pub fn with_codes(codes: Vec<AccessCode>) -> Self {
        Self {
            codes: RwLock::new(codes),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current contents
    pub fn snapshot(&self) -> Vec<AccessCode> {
        match self.codes.read() {
            Ok(codes) => codes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of `write_all` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self) -> Result<Vec<AccessCode>> {
        Ok(self.snapshot())
    }

    async fn write_all(&self, codes: &[AccessCode]) -> Result<()> {
        let mut guard = match self.codes.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = codes.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_starts_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.fetch().await.unwrap().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_write_replaces_collection() {
        let first = AccessCode::new("a", None).unwrap();
        let second = AccessCode::new("b", None).unwrap();
        let backend = MemoryBackend::with_codes(vec![first]);

        backend.write_all(&[second.clone()]).await.unwrap();

        assert_eq!(backend.snapshot(), vec![second]);
        assert_eq!(backend.write_count(), 1);
    }
}
