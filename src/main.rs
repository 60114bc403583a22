// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! accessgate - admin CLI for the access-code store
//!
//! Entry point for the accessgate binary.

use anyhow::Context;
use clap::Parser;

use accessgate::cli::{execute, Cli};
use accessgate::config::Settings;
use accessgate::CodeStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing. A set `RUST_LOG` replaces the default filter.
    let env_filter = match std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV) {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::new(default_filter(cli.verbose)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load settings
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load().context("loading settings")?,
    };

    let store = CodeStore::from_settings(settings);
    tracing::debug!(backend = %store.backend_kind(), "access-code store ready");

    let mut stdout = std::io::stdout();
    let ok = execute(&store, &cli.command, cli.format, &mut stdout).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Log filter used when `RUST_LOG` is unset: warnings, plus crate debug
/// (`-v`) or trace (`-vv`) output.
fn default_filter(verbose: u8) -> String {
    match verbose {
        0 => "warn".to_string(),
        1 => "warn,accessgate=debug".to_string(),
        _ => "warn,accessgate=trace".to_string(),
    }
}
