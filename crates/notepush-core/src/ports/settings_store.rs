//! Settings store port (driven/secondary port)
//!
//! Persists the whole [`Settings`] object, target registry included.
//!
//! ## Design Notes
//!
//! - `save` always writes the complete object. Implementations replace the
//!   stored copy wholesale so that an interrupted save loses the change but
//!   never leaves a half-written file.
//! - `load` returns a fully defaulted object when nothing has been saved yet.

use crate::config::Settings;

/// Port trait for loading and saving settings
#[async_trait::async_trait]
pub trait ISettingsStore: Send + Sync {
    /// Loads settings, falling back to defaults when none exist
    async fn load(&self) -> anyhow::Result<Settings>;

    /// Saves the full settings object
    async fn save(&self, settings: &Settings) -> anyhow::Result<()>;
}
