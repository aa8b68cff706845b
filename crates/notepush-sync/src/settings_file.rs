//! YAML settings file adapter (secondary/driven adapter)
//!
//! Implements [`ISettingsStore`] over a single YAML file. Saves replace the
//! file atomically (write-to-temp + rename in the same directory), so a
//! crash mid-save leaves the previous settings intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use notepush_core::config::Settings;
use notepush_core::ports::ISettingsStore;
use tracing::{debug, instrument};

/// Settings persisted as YAML at a fixed path
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    path: PathBuf,
}

impl YamlSettingsStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`Settings::default_path`]
    pub fn at_default_path() -> Self {
        Self::new(Settings::default_path())
    }

    /// Location of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut p = self.path.as_os_str().to_owned();
        p.push(".tmp");
        PathBuf::from(p)
    }
}

#[async_trait::async_trait]
impl ISettingsStore for YamlSettingsStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> anyhow::Result<Settings> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("settings file not found, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read {}", self.path.display())))
            }
        };
        Settings::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    #[instrument(skip(self, settings), fields(path = %self.path.display()))]
    async fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        let yaml = settings.to_yaml().context("Failed to serialize settings")?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp_path = self.tmp_path();
        debug!(?tmp_path, "writing settings to temporary file");
        tokio::fs::write(&tmp_path, yaml.as_bytes()).await?;

        debug!("renaming temporary file over settings file");
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(anyhow::Error::new(e).context("Failed to replace settings file"));
        }

        debug!(targets = settings.targets.len(), "settings saved");
        Ok(())
    }
}
