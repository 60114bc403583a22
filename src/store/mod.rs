// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Access-code domain: records, code generation, validation and the store

pub mod code_store;
pub mod codegen;
pub mod model;
pub mod validation;

pub use code_store::CodeStore;
pub use codegen::{generate_code, is_code_char, normalize_code, CODE_ALPHABET, CODE_LENGTH};
pub use model::{parse_timestamp, AccessCode, AccessCodeUpdate};
pub use validation::{InvalidReason, Validation};
