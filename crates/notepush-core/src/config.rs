//! Configuration module for notepush.
//!
//! Provides the typed settings object that maps to the YAML settings file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! The target registry lives inside the same object so that it is saved
//! together with the rest of the settings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{NoteId, SyncTarget};

/// Default base URL of the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// Settings struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level settings for notepush.
///
/// Every section is `#[serde(default)]`, so a partial or empty file loads
/// into a fully populated object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vault: VaultConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    /// Note id -> remote location; see `TargetRegistry`
    pub targets: BTreeMap<NoteId, SyncTarget>,
}

/// Local vault settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the note vault. A leading `~` is expanded at runtime.
    pub root: PathBuf,
}

/// GitHub API settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token. `None` falls back to the system keyring.
    pub access_token: Option<String>,
    /// Base URL of the REST API (change for GitHub Enterprise).
    pub api_url: String,
    /// Per-request timeout in seconds; 0 keeps the HTTP client's default.
    pub request_timeout_secs: u64,
}

/// Automatic sync triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Run a batch sync when the daemon starts.
    pub on_startup: bool,
    /// Minutes between recurring batch syncs; 0 disables recurrence.
    pub interval_minutes: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Settings::load()
// ---------------------------------------------------------------------------

impl Settings {
    /// Load settings from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Serialize the full settings object to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Platform-appropriate default path for the settings file.
    ///
    /// Typically `$XDG_CONFIG_HOME/notepush/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("notepush")
            .join("config.yaml")
    }

    /// The configured access token, if it is present and non-empty.
    pub fn access_token(&self) -> Option<&str> {
        self.github
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Vault root with a leading `~` expanded to the home directory.
    pub fn vault_root(&self) -> PathBuf {
        expand_home(&self.vault.root)
    }
}

/// Expands a leading `~` component to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Settings and SyncConfig derive Default because all their fields implement Default.
// (clippy::derivable_impls)

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Notes"),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 0,
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"logging.level"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Settings {
    /// Validate the settings and return all errors found.
    ///
    /// An empty vector means the settings are valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- github ---
        match url::Url::parse(&self.github.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError {
                field: "github.api_url".into(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "github.api_url".into(),
                message: format!("not a valid URL: {e}"),
            }),
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        // --- targets ---
        for (note, target) in &self.targets {
            if let Err(e) = target.validate() {
                errors.push(ValidationError {
                    field: format!("targets.{note}"),
                    message: e.to_string(),
                });
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// SettingsBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing [`Settings`] programmatically.
///
/// Starts from [`Settings::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use notepush_core::config::SettingsBuilder;
/// use std::path::PathBuf;
///
/// let settings = SettingsBuilder::new()
///     .vault_root(PathBuf::from("/home/user/Notes"))
///     .sync_interval_minutes(15)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Create a new builder initialised with [`Settings::default`] values.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn vault_root(mut self, root: PathBuf) -> Self {
        self.settings.vault.root = root;
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.settings.github.access_token = Some(token.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.settings.github.api_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.settings.github.request_timeout_secs = secs;
        self
    }

    pub fn sync_on_startup(mut self, enabled: bool) -> Self {
        self.settings.sync.on_startup = enabled;
        self
    }

    pub fn sync_interval_minutes(mut self, minutes: u64) -> Self {
        self.settings.sync.interval_minutes = minutes;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.settings.logging.level = level.into();
        self
    }

    pub fn target(mut self, note: NoteId, target: SyncTarget) -> Self {
        self.settings.targets.insert(note, target);
        self
    }

    /// Consume the builder and return the finished [`Settings`].
    pub fn build(self) -> Settings {
        self.settings
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the settings are invalid.
    pub fn build_validated(self) -> Result<Settings, Vec<ValidationError>> {
        let settings = self.build();
        let errors = settings.validate();
        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(errors)
        }
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
