// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for accessgate
//!
//! Handles loading and saving settings, and resolving backend credentials
//! from the environment.

pub mod settings;

pub use settings::*;
