// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Outcome of checking a user-supplied access code

use serde::Serialize;
use std::fmt;

use super::model::AccessCode;

/// Why a code was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Empty input or no record with that code
    InvalidCode,
    /// A record matched but its expiry has passed
    Expired,
}

impl InvalidReason {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::InvalidCode => "invalid code",
            InvalidReason::Expired => "code expired",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of `CodeStore::validate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The code grants access
    Valid(AccessCode),
    /// The code was refused. `user` is set when a record matched but expired.
    Invalid {
        reason: InvalidReason,
        user: Option<AccessCode>,
    },
}

impl Validation {
    pub(crate) fn invalid_code() -> Self {
        Validation::Invalid {
            reason: InvalidReason::InvalidCode,
            user: None,
        }
    }

    pub(crate) fn expired(user: AccessCode) -> Self {
        Validation::Invalid {
            reason: InvalidReason::Expired,
            user: Some(user),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// The matched record, if any (also present for expired codes)
    pub fn user(&self) -> Option<&AccessCode> {
        match self {
            Validation::Valid(user) => Some(user),
            Validation::Invalid { user, .. } => user.as_ref(),
        }
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            Validation::Valid(_) => None,
            Validation::Invalid { reason, .. } => Some(*reason),
        }
    }
}
