//! notepush sync - Note synchronization engine and local adapters
//!
//! Provides:
//! - Single-note and batch push of notes to their GitHub targets
//! - The filesystem vault and YAML settings-file adapters
//! - Rename/delete following for the target registry
//! - Startup and recurring sync triggers
//!
//! ## Modules
//!
//! - [`engine`] - Sync engine running single-note and batch syncs
//! - [`vault`] - Local vault adapter (`IVault` over a directory)
//! - [`settings_file`] - YAML settings adapter with atomic saves
//! - [`watcher`] - Vault watcher and registry event follower
//! - [`scheduler`] - Startup/interval/manual sync triggers
//! - [`notifier`] - Log-backed notification adapter

pub mod engine;
pub mod notifier;
pub mod scheduler;
pub mod settings_file;
pub mod vault;
pub mod watcher;

pub use engine::SyncEngine;
pub use notifier::TracingNotifier;
pub use scheduler::{SyncRequester, SyncScheduler, SyncTrigger};
pub use settings_file::YamlSettingsStore;
pub use vault::FileSystemVault;
pub use watcher::{follow_vault_events, VaultWatcher};
