//! Config command - View and manage notepush settings
//!
//! Provides the `notepush config` CLI command which:
//! 1. Shows the current settings (YAML or JSON), with the access token masked
//! 2. Sets individual values via dot-notation keys
//! 3. Validates the settings file and reports errors

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use notepush_core::config::Settings;
use tracing::info;

use super::CliContext;

/// Shown instead of a configured access token
const MASKED_TOKEN: &str = "********";

/// Keys accepted by `config set`, with a short description
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("vault.root", "Vault root directory"),
    ("github.access_token", "Personal access token (\"none\" to unset)"),
    ("github.api_url", "REST API base URL"),
    ("github.request_timeout_secs", "Per-request timeout, 0 = default"),
    ("sync.on_startup", "true|false"),
    ("sync.interval_minutes", "Minutes between syncs, 0 = off"),
    ("logging.level", "trace|debug|info|warn|error"),
];

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current settings
    Show,
    /// Set a settings value
    Set {
        /// Settings key (e.g., "sync.interval_minutes")
        key: String,
        /// New value
        value: String,
    },
    /// Validate the settings file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(ctx).await,
            ConfigCommand::Set { key, value } => execute_set(ctx, key, value).await,
            ConfigCommand::Validate => execute_validate(ctx),
        }
    }
}

async fn execute_show(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let settings = masked(ctx.settings_state().await?.snapshot().await);

    info!(config_path = %ctx.config_path.display(), "Showing configuration");

    if ctx.is_json() {
        let json =
            serde_json::to_value(&settings).context("Failed to serialize settings to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
        formatter.info("");
        for line in settings.to_yaml()?.lines() {
            formatter.info(line);
        }
    }
    Ok(())
}

async fn execute_set(ctx: &CliContext, key: &str, value: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let state = ctx.settings_state().await?;

    info!(key = %key, "Setting configuration value");

    let result = state
        .update(|settings| {
            apply_setting(settings, key, value)?;
            let errors = settings.validate();
            if !errors.is_empty() {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                anyhow::bail!("{}", msgs.join("; "));
            }
            Ok(())
        })
        .await;

    if let Err(e) = result {
        if !ctx.is_json() {
            formatter.info("Supported keys:");
            for (k, desc) in SUPPORTED_KEYS {
                formatter.info(&format!("  {k:<28} - {desc}"));
            }
        }
        return Err(e.context(format!("Failed to set '{key}'")));
    }

    // Never echo the token back.
    let shown = if key == "github.access_token" { MASKED_TOKEN } else { value };
    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "key": key,
            "value": shown,
            "config_path": ctx.config_path.display().to_string(),
        }));
    } else {
        formatter.success(&format!("Set {key} = {shown}"));
        formatter.info(&format!("Saved to {}", ctx.config_path.display()));
    }
    Ok(())
}

fn execute_validate(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let path = &ctx.config_path;

    if !path.exists() {
        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "valid": true,
                "config_path": path.display().to_string(),
                "errors": [],
                "note": "file not found, defaults in use",
            }));
        } else {
            formatter.info(&format!("Configuration file not found at {}", path.display()));
            formatter.info("Defaults are in use. Run 'notepush config set <key> <value>' to create one.");
        }
        return Ok(());
    }

    let settings = Settings::load(path)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
    let errors = settings.validate();

    if ctx.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", path.display()));
    } else {
        formatter.info(&format!("File: {}", path.display()));
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    if !errors.is_empty() {
        anyhow::bail!(
            "Configuration has {}",
            crate::output::plural(errors.len() as u64, "error")
        );
    }
    Ok(())
}

fn masked(mut settings: Settings) -> Settings {
    if settings.github.access_token.is_some() {
        settings.github.access_token = Some(MASKED_TOKEN.to_string());
    }
    settings
}

/// Applies a dot-notation key/value pair to the settings
fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "vault.root" => settings.vault.root = PathBuf::from(value),
        "github.access_token" => {
            let value = value.trim();
            settings.github.access_token = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }
        "github.api_url" => settings.github.api_url = value.to_string(),
        "github.request_timeout_secs" => {
            settings.github.request_timeout_secs = value
                .parse::<u64>()
                .context("Expected a non-negative integer")?;
        }
        "sync.on_startup" => {
            settings.sync.on_startup = value
                .parse::<bool>()
                .context("Expected 'true' or 'false'")?;
        }
        "sync.interval_minutes" => {
            settings.sync.interval_minutes = value
                .parse::<u64>()
                .context("Expected a non-negative integer")?;
        }
        "logging.level" => settings.logging.level = value.to_string(),
        _ => anyhow::bail!("Unknown configuration key: '{}'", key),
    }
    Ok(())
}
