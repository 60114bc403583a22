// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for accessgate
//!
//! Transport failures live in [`BackendError`]; domain negatives that callers
//! branch on (not-found, duplicates, bad input) are variants of [`AccessError`].
//! Invalid or expired codes are not errors at all, see `store::Validation`.

use thiserror::Error;

/// Main error type for access-code operations
#[derive(Error, Debug)]
pub enum AccessError {
    /// Storage backend failure
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// No record with the given id
    #[error("Access code not found: {id}")]
    NotFound { id: String },

    /// Another record already uses this code
    #[error("Duplicate access code: {0}")]
    DuplicateCode(String),

    /// Another record already uses this id
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Transport-level failures reported by a storage backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend unreachable
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status from a REST backend
    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Response did not match the expected wire shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Stored payload is not a valid access-code collection
    #[error("Malformed payload: {0}")]
    Payload(String),

    /// Redis command failure
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type alias for access-code operations
pub type Result<T> = std::result::Result<T, AccessError>;

impl AccessError {
    /// Create a not-found error for a record id
    pub fn not_found(id: impl Into<String>) -> Self {
        AccessError::NotFound { id: id.into() }
    }

    /// Whether this error is a not-found negative rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::NotFound { .. })
    }
}

impl From<redis::RedisError> for AccessError {
    fn from(err: redis::RedisError) -> Self {
        AccessError::Backend(BackendError::Redis(err))
    }
}
