// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines the admin subcommands for managing access codes.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::store::{parse_timestamp, AccessCodeUpdate};

/// accessgate - manage the access codes that gate the chat feature
#[derive(Parser, Debug)]
#[command(name = "accessgate")]
#[command(version, about = "Manage access codes for the chat feature")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List all access codes
    #[command(alias = "ls")]
    List,

    /// Create an access code with a freshly generated code
    Add(AddArgs),

    /// Change the name or expiry of an access code
    Update(UpdateArgs),

    /// Delete an access code
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Check whether a code currently grants access
    Validate(ValidateArgs),

    /// Print a fresh random code without storing it
    Generate,

    /// Show which storage backend the configuration selects
    Backend,
}

/// Arguments for the add subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    /// Display name of the code holder
    pub name: String,

    /// Expiry as RFC 3339 or YYYY-MM-DD (UTC midnight); omit for no expiry
    #[arg(long, value_parser = parse_expiry)]
    pub expires: Option<DateTime<Utc>>,
}

/// Arguments for the update subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Record id
    pub id: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New expiry as RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = parse_expiry, conflicts_with = "no_expiry")]
    pub expires: Option<DateTime<Utc>>,

    /// Remove the expiry so the code never expires
    #[arg(long)]
    pub no_expiry: bool,
}

impl UpdateArgs {
    /// The partial update these arguments describe
    pub fn to_update(&self) -> AccessCodeUpdate {
        let mut update = AccessCodeUpdate::new();
        if let Some(name) = &self.name {
            update = update.name(name.clone());
        }
        if self.no_expiry {
            update = update.expiry_date(None);
        } else if let Some(expires) = self.expires {
            update = update.expiry_date(Some(expires));
        }
        update
    }
}

/// Arguments for the delete subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,
}

/// Arguments for the validate subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Code as a user would enter it (case and surrounding spaces are ignored)
    pub code: String,
}

/// Output format for responses
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| format!("invalid date '{raw}': use RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cli_list() {
        let cli = Cli::parse_from(["accessgate", "list"]);
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_list_alias_and_globals() {
        let cli = Cli::parse_from(["accessgate", "ls", "-vv", "--format", "json"]);
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["accessgate", "--config", "/etc/ag.json", "backend"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/ag.json")));
        assert!(matches!(cli.command, Commands::Backend));
    }

    #[test]
    fn test_cli_add_with_date_expiry() {
        let cli = Cli::parse_from(["accessgate", "add", "Kevin", "--expires", "2026-01-31"]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.name, "Kevin");
                assert_eq!(
                    args.expires,
                    Some(Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap())
                );
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_add_rejects_bad_date() {
        let result = Cli::try_parse_from(["accessgate", "add", "Kevin", "--expires", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_update_conflicting_expiry_flags() {
        let result = Cli::try_parse_from([
            "accessgate",
            "update",
            "abc",
            "--expires",
            "2026-01-01",
            "--no-expiry",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_args_to_update() {
        let cli = Cli::parse_from(["accessgate", "update", "abc", "--name", "Ana", "--no-expiry"]);
        let Commands::Update(args) = cli.command else {
            panic!("Expected Update command");
        };

        let update = args.to_update();
        assert_eq!(update.name.as_deref(), Some("Ana"));
        assert_eq!(update.expiry_date, Some(None));
    }

    #[test]
    fn test_update_args_without_flags_is_empty() {
        let cli = Cli::parse_from(["accessgate", "update", "abc"]);
        let Commands::Update(args) = cli.command else {
            panic!("Expected Update command");
        };
        assert!(args.to_update().is_empty());
    }

    #[test]
    fn test_cli_delete_alias() {
        let cli = Cli::parse_from(["accessgate", "rm", "abc"]);
        match cli.command {
            Commands::Delete(args) => assert_eq!(args.id, "abc"),
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["accessgate"]).is_err());
    }
}
