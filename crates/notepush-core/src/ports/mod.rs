//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Versioned remote file store (GitHub contents API)
//! - [`IVault`] / [`IVaultObserver`] - Local note vault and its lifecycle events
//! - [`ISettingsStore`] - Persistence for the settings object and target registry
//! - [`INotificationService`] - Short-lived user notifications

pub mod notification;
pub mod remote_store;
pub mod settings_store;
pub mod vault;

pub use notification::{INotificationService, Notification, NotificationPriority};
pub use remote_store::{FileWrite, IRemoteStore, RemoteFileState, WriteReceipt};
pub use settings_store::ISettingsStore;
pub use vault::{IVault, IVaultObserver, VaultEvent};
