//! Auth commands - Manage the GitHub access token
//!
//! Provides the `notepush auth` CLI subcommands:
//! 1. `set-token` - Stores a personal access token in the system keyring.
//! 2. `clear`     - Removes the token from the keyring.
//! 3. `status`    - Shows where the token of the next sync would come from.
//!
//! A token in the settings file (`github.access_token`) takes precedence over
//! the keyring. The token itself is never printed.

use anyhow::{Context, Result};
use clap::Subcommand;
use notepush_github::auth::{KeyringCredentialStore, TokenSource};
use tracing::info;

use super::{resolve_credential, token_source_name, CliContext};

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Store a GitHub personal access token in the system keyring
    SetToken {
        /// Token with contents:write permission on the target repositories
        token: String,
    },
    /// Remove the token from the system keyring
    Clear,
    /// Show which access token would be used
    Status,
}

impl AuthCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            AuthCommand::SetToken { token } => execute_set_token(ctx, token),
            AuthCommand::Clear => execute_clear(ctx),
            AuthCommand::Status => execute_status(ctx).await,
        }
    }
}

fn execute_set_token(ctx: &CliContext, token: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let store = KeyringCredentialStore::default();
    store
        .store(token)
        .context("Failed to store token in keyring")?;
    info!(account = store.account(), "Access token stored");

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({"stored": true, "account": store.account()}));
    } else {
        formatter.success("Access token stored in the system keyring");
    }
    Ok(())
}

fn execute_clear(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    KeyringCredentialStore::default()
        .clear()
        .context("Failed to clear token from keyring")?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({"cleared": true}));
    } else {
        formatter.success("Access token removed from the system keyring");
    }
    Ok(())
}

async fn execute_status(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let settings = ctx.settings_state().await?.snapshot().await;
    let source = resolve_credential(&settings).map(|(_, source)| source);

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "configured": source.is_some(),
            "source": source.map(|s| match s {
                TokenSource::Settings => "settings",
                TokenSource::Keyring => "keyring",
            }),
        }));
        return Ok(());
    }

    match source {
        Some(source) => {
            formatter.success("GitHub access token configured");
            formatter.info(&format!("Source: {}", token_source_name(source)));
        }
        None => {
            formatter.warn("No GitHub access token configured");
            formatter.info("Run 'notepush auth set-token <TOKEN>' or set github.access_token");
        }
    }
    Ok(())
}
