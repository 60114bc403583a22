// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Code store: the domain API over the active backend
//!
//! Every operation reads the whole collection from the active backend,
//! works on it in memory and, for mutations, writes the whole collection
//! back. Nothing is cached between calls.
//!
//! # Concurrency
//!
//! Mutations are read-modify-write on the full collection with no lock and
//! no version check. Two concurrent mutations against the same backend can
//! race, and the later write wins, discarding the earlier change. This is
//! accepted for low-rate administrative writes; callers that need more must
//! serialize admin mutations themselves.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use super::codegen::{self, is_well_formed, normalize_code};
use super::model::{normalize_name, truncate_millis, AccessCode, AccessCodeUpdate};
use super::validation::Validation;
use crate::backend::{BackendKind, BackendRegistry, CodeBackend};
use crate::config::{ReadFailurePolicy, Settings};
use crate::error::{AccessError, Result};

pub struct CodeStore {
    registry: BackendRegistry,
    read_policy: ReadFailurePolicy,
    max_generation_attempts: u32,
}

impl CodeStore {
    /// Create a store over a backend registry
    pub fn new(registry: BackendRegistry) -> Self {
        let store = &registry.settings().store;
        let read_policy = store.read_failure_policy;
        let max_generation_attempts = store.max_generation_attempts.max(1);
        Self {
            registry,
            read_policy,
            max_generation_attempts,
        }
    }

    /// Create a store that selects its backend from `settings`
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(BackendRegistry::new(settings))
    }

    /// Create a store over a fixed backend
    pub fn with_backend(backend: Arc<dyn CodeBackend>) -> Self {
        Self::new(BackendRegistry::with_backend(backend))
    }

    /// Override how failed reads are treated
    pub fn with_read_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// The tier the current configuration selects
    pub fn backend_kind(&self) -> BackendKind {
        self.registry.selected_kind()
    }

    async fn load(&self, backend: &dyn CodeBackend) -> Result<Vec<AccessCode>> {
        match self.read_policy {
            ReadFailurePolicy::Degrade => Ok(backend.read_all().await),
            ReadFailurePolicy::Propagate => backend.fetch().await,
        }
    }

    /// Read for a mutation. A failed read aborts before any write, whatever
    /// the read policy.
    async fn load_for_write(&self, backend: &dyn CodeBackend) -> Result<Vec<AccessCode>> {
        backend.fetch().await.inspect_err(|e| {
            tracing::warn!(
                backend = backend.name(),
                error = %e,
                "access-code read failed; mutation aborted"
            );
        })
    }

    /// All records, in stored order
    pub async fn get_all(&self) -> Result<Vec<AccessCode>> {
        let backend = self.registry.active()?;
        self.load(backend.as_ref()).await
    }

    /// Exact, case-sensitive lookup by code
    pub async fn get_by_code(&self, code: &str) -> Result<Option<AccessCode>> {
        let codes = self.get_all().await?;
        Ok(codes.into_iter().find(|c| c.code == code))
    }

    /// Add a fully-formed record.
    ///
    /// Rejects a blank name, a malformed code, or an `id`/`code` already in
    /// the collection; nothing is written in those cases.
    pub async fn add(&self, mut record: AccessCode) -> Result<()> {
        normalize_name(&record.name)?;
        record.expiry_date = record.expiry_date.map(truncate_millis);
        record.created_at = truncate_millis(record.created_at);
        if !is_well_formed(&record.code) {
            return Err(AccessError::InvalidInput(format!(
                "code must be {} symbols from the code alphabet",
                codegen::CODE_LENGTH
            )));
        }

        let backend = self.registry.active()?;
        let mut codes = self.load_for_write(backend.as_ref()).await?;
        if codes.iter().any(|c| c.id == record.id) {
            return Err(AccessError::DuplicateId(record.id));
        }
        if codes.iter().any(|c| c.code == record.code) {
            return Err(AccessError::DuplicateCode(record.code));
        }

        tracing::info!(id = %record.id, backend = backend.name(), "adding access code");
        codes.push(record);
        backend.write_all(&codes).await
    }

    /// Create and store a record with a freshly generated, unused code.
    ///
    /// Draws again on collision, up to `store.max_generation_attempts` times.
    pub async fn create(
        &self,
        name: &str,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<AccessCode> {
        self.create_with(name, expiry_date, codegen::generate_code).await
    }

    async fn create_with(
        &self,
        name: &str,
        expiry_date: Option<DateTime<Utc>>,
        mut next_code: impl FnMut() -> String,
    ) -> Result<AccessCode> {
        let mut record = AccessCode::new(name, expiry_date)?;

        let backend = self.registry.active()?;
        let mut codes = self.load_for_write(backend.as_ref()).await?;
        let taken: HashSet<String> = codes.iter().map(|c| c.code.clone()).collect();

        record.code = next_code();
        let mut attempts = 1;
        while taken.contains(&record.code) {
            if attempts >= self.max_generation_attempts {
                return Err(AccessError::DuplicateCode(record.code));
            }
            tracing::debug!(attempt = attempts, "generated code collided; regenerating");
            record.code = next_code();
            attempts += 1;
        }

        tracing::info!(id = %record.id, backend = backend.name(), "creating access code");
        codes.push(record.clone());
        backend.write_all(&codes).await?;
        Ok(record)
    }

    /// Merge the supplied fields into the record with `id`.
    ///
    /// Returns the updated record, or `NotFound` without writing.
    pub async fn update(&self, id: &str, changes: AccessCodeUpdate) -> Result<AccessCode> {
        let changes = changes.normalized()?;

        let backend = self.registry.active()?;
        let mut codes = self.load_for_write(backend.as_ref()).await?;
        let record = codes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AccessError::not_found(id))?;

        changes.apply(record);
        let updated = record.clone();

        tracing::info!(id, backend = backend.name(), "updating access code");
        backend.write_all(&codes).await?;
        Ok(updated)
    }

    /// Remove the record with `id`.
    ///
    /// Returns the removed record, or `NotFound` without writing.
    pub async fn delete(&self, id: &str) -> Result<AccessCode> {
        let backend = self.registry.active()?;
        let mut codes = self.load_for_write(backend.as_ref()).await?;
        let index = codes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AccessError::not_found(id))?;

        let removed = codes.remove(index);
        tracing::info!(id, backend = backend.name(), "deleting access code");
        backend.write_all(&codes).await?;
        Ok(removed)
    }

    /// Check a user-supplied code against the current time.
    pub async fn validate(&self, input: &str) -> Result<Validation> {
        self.validate_at(input, Utc::now()).await
    }

    /// Check a user-supplied code as of `now`.
    ///
    /// Input is trimmed and upper-cased. Blank input is refused without
    /// touching the backend.
    pub async fn validate_at(&self, input: &str, now: DateTime<Utc>) -> Result<Validation> {
        let code = normalize_code(input);
        if code.is_empty() {
            return Ok(Validation::invalid_code());
        }

        let Some(user) = self.get_by_code(&code).await? else {
            return Ok(Validation::invalid_code());
        };

        if user.is_expired_at(now) {
            tracing::debug!(id = %user.id, "access code expired");
            return Ok(Validation::expired(user));
        }
        Ok(Validation::Valid(user))
    }

    /// Draw a fresh code. Not checked against stored codes; see [`CodeStore::create`].
    pub fn generate_code() -> String {
        codegen::generate_code()
    }
}
