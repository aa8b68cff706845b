//! Single-note synchronization use case
//!
//! Pushes the current content of one note to its configured remote file:
//! read the note, look up the remote revision, then create or update the
//! file with that revision as the concurrency token. Every failure is
//! mapped into a [`SyncError`] naming the step that failed.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::domain::{NoteId, SyncError};
use crate::ports::{FileWrite, IRemoteStore, IVault, WriteReceipt};

use super::target_registry::TargetRegistry;

/// Use case for pushing one note to its remote target
pub struct SyncNoteUseCase {
    registry: TargetRegistry,
    vault: Arc<dyn IVault>,
    remote: Arc<dyn IRemoteStore>,
    credential: Option<String>,
}

impl SyncNoteUseCase {
    /// Creates a new SyncNoteUseCase
    ///
    /// # Arguments
    ///
    /// * `registry` - Source of note targets
    /// * `vault` - Local note storage
    /// * `remote` - Versioned remote file store
    /// * `credential` - Access token; blank or `None` fails every sync
    pub fn new(
        registry: TargetRegistry,
        vault: Arc<dyn IVault>,
        remote: Arc<dyn IRemoteStore>,
        credential: Option<String>,
    ) -> Self {
        let credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self {
            registry,
            vault,
            remote,
            credential,
        }
    }

    /// The registry this use case reads targets from
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Synchronizes `note` to its configured target
    ///
    /// The target and credential are checked before any I/O. The remote
    /// revision is always fetched fresh; a write is only attempted after
    /// that lookup succeeded. Nothing is retried.
    pub async fn try_sync_one(&self, note: &NoteId) -> Result<WriteReceipt, SyncError> {
        let target = self
            .registry
            .target(note)
            .await
            .ok_or_else(|| SyncError::NoTargetConfigured(note.to_string()))?;
        target.validate().map_err(|e| SyncError::InvalidTarget {
            note: note.to_string(),
            reason: e.to_string(),
        })?;
        let credential = self
            .credential
            .as_deref()
            .ok_or(SyncError::MissingCredential)?;

        let content = self.read_encoded(note).await?;

        let state = self
            .remote
            .file_state(credential, &target)
            .await
            .map_err(|e| SyncError::RemoteReadFailed {
                location: target.to_string(),
                reason: format!("{e:#}"),
            })?;
        debug!(note = %note, target = %target, sha = ?state.sha(), "Fetched remote state");

        let write = FileWrite {
            message: commit_message(note),
            content,
            branch: target.branch.clone(),
            sha: state.sha().map(str::to_string),
        };

        let receipt = self
            .remote
            .put_file(credential, &target, &write)
            .await
            .map_err(|e| SyncError::RemoteWriteFailed {
                location: target.to_string(),
                reason: format!("{e:#}"),
            })?;

        info!(
            note = %note,
            target = %target,
            created = write.sha.is_none(),
            commit = ?receipt.commit_sha,
            "Note synced"
        );
        Ok(receipt)
    }

    async fn read_encoded(&self, note: &NoteId) -> Result<String, SyncError> {
        if !self.vault.exists(note).await {
            return Err(SyncError::NoteUnreadable {
                note: note.to_string(),
                reason: "note not found in vault".to_string(),
            });
        }
        let text = self
            .vault
            .read_note(note)
            .await
            .map_err(|e| SyncError::NoteUnreadable {
                note: note.to_string(),
                reason: format!("{e:#}"),
            })?;
        Ok(BASE64.encode(text.as_bytes()))
    }
}

/// Commit message for a sync of `note` made now
pub fn commit_message(note: &NoteId) -> String {
    format!(
        "Sync {} at {}",
        note.display_name(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
