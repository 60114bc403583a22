// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command execution for the admin CLI

use serde::Serialize;
use std::io::Write;

use super::args::{Commands, OutputFormat};
use crate::error::{AccessError, Result};
use crate::store::model::timestamp;
use crate::store::{AccessCode, CodeStore, Validation};

/// JSON shape of a validation result: `{ valid, reason?, user? }`
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a AccessCode>,
}

impl<'a> From<&'a Validation> for ValidationReport<'a> {
    fn from(validation: &'a Validation) -> Self {
        Self {
            valid: validation.is_valid(),
            reason: validation.reason().map(|r| r.message()),
            user: validation.user(),
        }
    }
}

/// Run one admin command, writing its output to `out`.
///
/// Returns `false` when the command completed but reports a negative
/// result (a refused code), so the binary can exit non-zero.
pub async fn execute<W: Write>(
    store: &CodeStore,
    command: &Commands,
    format: OutputFormat,
    out: &mut W,
) -> Result<bool> {
    match command {
        Commands::List => {
            let codes = store.get_all().await?;
            match format {
                OutputFormat::Json => print_json(out, &codes)?,
                OutputFormat::Text => {
                    if codes.is_empty() {
                        writeln!(out, "No access codes.")?;
                    }
                    for code in &codes {
                        writeln!(out, "{}", describe(code))?;
                    }
                }
            }
        }
        Commands::Add(args) => {
            let created = store.create(&args.name, args.expires).await?;
            match format {
                OutputFormat::Json => print_json(out, &created)?,
                OutputFormat::Text => writeln!(out, "Created {}", describe(&created))?,
            }
        }
        Commands::Update(args) => {
            let update = args.to_update();
            if update.is_empty() {
                return Err(AccessError::InvalidInput(
                    "nothing to update: pass --name, --expires or --no-expiry".to_string(),
                ));
            }
            let updated = store.update(&args.id, update).await?;
            match format {
                OutputFormat::Json => print_json(out, &updated)?,
                OutputFormat::Text => writeln!(out, "Updated {}", describe(&updated))?,
            }
        }
        Commands::Delete(args) => {
            let removed = store.delete(&args.id).await?;
            match format {
                OutputFormat::Json => print_json(out, &removed)?,
                OutputFormat::Text => writeln!(out, "Deleted {}", describe(&removed))?,
            }
        }
        Commands::Validate(args) => {
            let validation = store.validate(&args.code).await?;
            match format {
                OutputFormat::Json => print_json(out, &ValidationReport::from(&validation))?,
                OutputFormat::Text => match &validation {
                    Validation::Valid(user) => writeln!(out, "valid ({})", user.name)?,
                    Validation::Invalid { reason, user } => match user {
                        Some(user) => writeln!(out, "{reason} ({})", user.name)?,
                        None => writeln!(out, "{reason}")?,
                    },
                },
            }
            return Ok(validation.is_valid());
        }
        Commands::Generate => {
            writeln!(out, "{}", CodeStore::generate_code())?;
        }
        Commands::Backend => {
            writeln!(out, "{}", store.backend_kind())?;
        }
    }
    Ok(true)
}

fn describe(code: &AccessCode) -> String {
    let expiry = code
        .expiry_date
        .as_ref()
        .map(timestamp::format)
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{}  {}  {}  (expires: {})",
        code.code, code.id, code.name, expiry
    )
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
