// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Access-code generation and normalization

use rand::Rng;

/// Symbols a code may contain. Visually ambiguous characters (0/O, 1/I) are left out.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of symbols in a code
pub const CODE_LENGTH: usize = 8;

/// Draw a fresh code of independent uniform symbols.
///
/// Codes are not checked against existing ones here; the store handles
/// collisions when it assigns a code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize user input for lookup: trim surrounding whitespace and upper-case.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Whether `c` is one of the code alphabet's symbols
pub fn is_code_char(c: char) -> bool {
    c.is_ascii() && CODE_ALPHABET.contains(&(c as u8))
}

/// Whether `code` has the stored shape: exact length, alphabet symbols only.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(is_code_char)
}
