//! Target registry use case
//!
//! Owns the note → [`SyncTarget`] mapping. Entries live inside the shared
//! [`Settings`](crate::config::Settings) object and are persisted through
//! [`SettingsState`] before any change becomes visible.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::domain::{NoteId, SyncTarget};
use crate::ports::IVaultObserver;

use super::settings_state::SettingsState;

/// Note-to-target mapping with persistence and rename/delete following
#[derive(Clone)]
pub struct TargetRegistry {
    state: Arc<SettingsState>,
}

impl TargetRegistry {
    /// Creates a registry backed by the shared settings state
    pub fn new(state: Arc<SettingsState>) -> Self {
        Self { state }
    }

    /// Inserts or fully replaces the target for `note`
    pub async fn set_target(&self, note: &NoteId, target: SyncTarget) -> Result<()> {
        info!(note = %note, target = %target, "Setting sync target");
        self.state
            .update(|s| {
                s.targets.insert(note.clone(), target);
                Ok(())
            })
            .await
    }

    /// Removes the target for `note`
    ///
    /// Returns `false` if the note had no target.
    pub async fn clear_target(&self, note: &NoteId) -> Result<bool> {
        let removed = self
            .state
            .update(|s| Ok(s.targets.remove(note).is_some()))
            .await?;
        if removed {
            info!(note = %note, "Cleared sync target");
        } else {
            debug!(note = %note, "No sync target to clear");
        }
        Ok(removed)
    }

    /// Moves the entry for `old` to `new`, replacing any entry at `new`
    ///
    /// Returns `false` if `old` had no target; nothing changes in that case.
    pub async fn rename_note(&self, old: &NoteId, new: &NoteId) -> Result<bool> {
        if old == new {
            return Ok(self.target(old).await.is_some());
        }
        let moved = self
            .state
            .update(|s| match s.targets.remove(old) {
                Some(target) => {
                    s.targets.insert(new.clone(), target);
                    Ok(true)
                }
                None => Ok(false),
            })
            .await?;
        if moved {
            info!(from = %old, to = %new, "Sync target followed renamed note");
        }
        Ok(moved)
    }

    /// Drops the target of a note that was deleted from the vault
    pub async fn on_note_deleted(&self, note: &NoteId) -> Result<bool> {
        self.clear_target(note).await
    }

    /// Snapshot of every configured target
    pub async fn all_targets(&self) -> BTreeMap<NoteId, SyncTarget> {
        self.state.read(|s| s.targets.clone()).await
    }

    /// Target configured for `note`, if any
    pub async fn target(&self, note: &NoteId) -> Option<SyncTarget> {
        self.state.read(|s| s.targets.get(note).cloned()).await
    }

    /// Re-reads the persisted settings, picking up edits made by another process
    pub async fn reload(&self) -> Result<()> {
        self.state.reload().await
    }
}

#[async_trait::async_trait]
impl IVaultObserver for TargetRegistry {
    async fn on_renamed(&self, from: &NoteId, to: &NoteId) -> Result<()> {
        self.rename_note(from, to).await.map(|_| ())
    }

    async fn on_deleted(&self, note: &NoteId) -> Result<()> {
        self.on_note_deleted(note).await.map(|_| ())
    }
}
