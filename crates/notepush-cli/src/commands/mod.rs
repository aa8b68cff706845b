//! CLI subcommands
//!
//! Every command receives a [`CliContext`] carrying the global flags and
//! builds the adapters it needs from the settings file.

pub mod auth;
pub mod completions;
pub mod config;
pub mod sync;
pub mod target;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notepush_core::config::Settings;
use notepush_core::usecases::{SettingsState, TargetRegistry};
use notepush_github::auth::{resolve_access_token, KeyringCredentialStore, TokenSource};
use notepush_sync::YamlSettingsStore;
use tracing::debug;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Global options shared by all subcommands
#[derive(Debug, Clone)]
pub struct CliContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config_path: PathBuf,
}

impl CliContext {
    pub fn new(format: OutputFormat, quiet: bool, config_path: Option<PathBuf>) -> Self {
        Self {
            format,
            quiet,
            config_path: config_path.unwrap_or_else(Settings::default_path),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    pub fn settings_store(&self) -> Arc<YamlSettingsStore> {
        Arc::new(YamlSettingsStore::new(self.config_path.clone()))
    }

    /// Loads the settings file into a shared state container
    pub async fn settings_state(&self) -> Result<Arc<SettingsState>> {
        debug!(config_path = %self.config_path.display(), "Loading settings");
        let state = SettingsState::load(self.settings_store())
            .await
            .with_context(|| format!("Failed to load {}", self.config_path.display()))?;
        Ok(Arc::new(state))
    }

    pub async fn registry(&self) -> Result<TargetRegistry> {
        Ok(TargetRegistry::new(self.settings_state().await?))
    }
}

/// Access token for a run: the settings value, else the keyring entry
pub fn resolve_credential(settings: &Settings) -> Option<(String, TokenSource)> {
    resolve_access_token(settings.access_token(), &KeyringCredentialStore::default())
}

pub fn token_source_name(source: TokenSource) -> &'static str {
    match source {
        TokenSource::Settings => "settings file",
        TokenSource::Keyring => "system keyring",
    }
}
