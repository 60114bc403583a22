// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! accessgate - access-code store for gating a chat feature.
//!
//! This crate exposes:
//! - `store`: the domain API (CRUD, validate, generate) over access codes
//! - `backend`: storage adapters and the priority-based backend selector
//!   (networked cache, REST cache, managed KV, local file, in-memory)
//! - `config`: settings and credential resolution
//! - `cli`: the `accessgate` admin command line
//!
//! Callers (the chat gateway and the admin surface) use [`CodeStore`]:
//! `validate` before letting a conversation through, the CRUD operations
//! after their own authorization check.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use error::{AccessError, BackendError, Result};
pub use store::{AccessCode, AccessCodeUpdate, CodeStore, InvalidReason, Validation};
