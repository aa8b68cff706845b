//! Vault port (driven/secondary port)
//!
//! This module defines the interface for reading notes out of the local
//! vault and for subscribing to note lifecycle events (rename, delete).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because vault errors are adapter-specific.
//! - Lifecycle events are delivered to an [`IVaultObserver`]; any host that
//!   can see renames and deletes satisfies the contract by calling the two
//!   handlers.

use crate::domain::NoteId;

/// A lifecycle event for a note in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// A note moved from one id to another
    Renamed {
        /// Id before the rename
        from: NoteId,
        /// Id after the rename
        to: NoteId,
    },
    /// A note was removed from the vault
    Deleted(NoteId),
}

/// Port trait for reading notes from the local vault
#[async_trait::async_trait]
pub trait IVault: Send + Sync {
    /// Reads a note's current content as UTF-8 text
    ///
    /// # Errors
    /// Returns an error if the note does not exist, cannot be read, or is
    /// not valid UTF-8
    async fn read_note(&self, note: &NoteId) -> anyhow::Result<String>;

    /// Returns true if the note resolves to a readable file
    async fn exists(&self, note: &NoteId) -> bool;

    /// Enumerates every note in the vault
    async fn list_notes(&self) -> anyhow::Result<Vec<NoteId>>;
}

/// Observer for note lifecycle events
///
/// The target registry implements this so that targets follow their notes.
#[async_trait::async_trait]
pub trait IVaultObserver: Send + Sync {
    /// Called after a note has been renamed or moved
    async fn on_renamed(&self, from: &NoteId, to: &NoteId) -> anyhow::Result<()>;

    /// Called after a note has been deleted
    async fn on_deleted(&self, note: &NoteId) -> anyhow::Result<()>;
}
