//! Vault lifecycle watching
//!
//! Provides a [`VaultWatcher`] that wraps the `notify` crate to monitor the
//! vault directory, converting raw OS events into [`VaultEvent`] values, and
//! [`follow_vault_events`], which applies those events to the target
//! registry so that targets follow their notes.
//!
//! ## Architecture
//!
//! ```text
//! inotify / kqueue
//!       │
//!       ▼
//!  VaultWatcher  ──→  mpsc::channel  ──→  follow_vault_events  ──→  TargetRegistry
//! ```
//!
//! Content changes are not reported: syncing is driven by the scheduler,
//! not by edits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notepush_core::domain::NoteId;
use notepush_core::ports::{IVaultObserver, VaultEvent};
use notepush_core::usecases::TargetRegistry;
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::vault::FileSystemVault;

/// Capacity of the event channel between the watcher thread and consumers
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// VaultWatcher
// ============================================================================

/// Watches the vault directory for note renames and deletions
///
/// On Linux this typically uses inotify. Dropping the watcher stops
/// watching and closes the event channel.
///
/// ## Usage
///
/// ```ignore
/// let (mut watcher, rx) = VaultWatcher::new("/home/user/Notes")?;
/// watcher.watch()?;
/// tokio::spawn(follow_vault_events(rx, registry));
/// ```
pub struct VaultWatcher {
    /// The underlying notify watcher instance
    watcher: RecommendedWatcher,
    /// Canonical vault root being watched
    root: PathBuf,
}

impl VaultWatcher {
    /// Creates a watcher for the vault at `root`
    ///
    /// # Returns
    /// A tuple of `(VaultWatcher, mpsc::Receiver<VaultEvent>)`.
    ///
    /// # Errors
    /// Returns an error if the underlying OS watcher cannot be created
    pub fn new(root: impl AsRef<Path>) -> Result<(Self, mpsc::Receiver<VaultEvent>)> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let (event_tx, event_rx) = mpsc::channel::<VaultEvent>(EVENT_CHANNEL_CAPACITY);
        let vault = FileSystemVault::new(root.clone());

        info!(root = %root.display(), "Initializing vault watcher");

        let watcher = RecommendedWatcher::new(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(vault_event) = map_notify_event(&vault, &event) {
                        if let Err(e) = event_tx.blocking_send(vault_event) {
                            warn!(error = %e, "Failed to send vault event (receiver dropped)");
                        }
                    }
                }
                Err(err) => {
                    error!(error = %err, "Vault watcher error");
                }
            },
            notify::Config::default(),
        )
        .context("Failed to create vault watcher")?;

        Ok((Self { watcher, root }, event_rx))
    }

    /// Starts watching the vault recursively
    ///
    /// # Errors
    /// Returns an error if the vault cannot be watched (e.g., does not exist,
    /// insufficient permissions, or inotify watch limit reached)
    pub fn watch(&mut self) -> Result<()> {
        info!(root = %self.root.display(), "Starting recursive vault watch");
        self.watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch vault: {}", self.root.display()))
    }

    /// The canonical vault root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

// ============================================================================
// Event mapping - notify::Event → VaultEvent
// ============================================================================

/// Converts a `notify::Event` into a [`VaultEvent`]
///
/// - `Modify(Name(Both))` with 2 paths -> `VaultEvent::Renamed`
/// - `Remove(*)` -> `VaultEvent::Deleted`
///
/// A note renamed to a path that is not a note (`a.md` -> `a.md~`) is
/// ignored; the note keeps its target.
///
/// Half-renames (`Name(From)` / `Name(To)`) are ignored: a move inside the
/// vault also produces a `Both` event, and treating the `From` half as a
/// deletion would drop the target before the rename arrives.
/// A rename into a hidden directory or out of the vault counts as a deletion.
/// Other paths outside the vault or under hidden directories are ignored.
fn map_notify_event(vault: &FileSystemVault, event: &notify::Event) -> Option<VaultEvent> {
    let paths = &event.paths;

    match &event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if paths.len() < 2 {
                debug!(kind = ?event.kind, "Rename with single path, ignoring");
                return None;
            }
            let from = vault.note_id_for(&paths[0])?;
            if FileSystemVault::is_note_path(&paths[0]) && !FileSystemVault::is_note_path(&paths[1])
            {
                // Editors save by renaming the note to a backup before rewriting it.
                debug!(
                    from = %from,
                    to = %paths[1].display(),
                    "Note renamed to a non-note file, ignoring"
                );
                return None;
            }
            match vault.note_id_for(&paths[1]) {
                Some(to) => {
                    debug!(from = %from, to = %to, "Mapped Rename event");
                    Some(VaultEvent::Renamed { from, to })
                }
                None => {
                    debug!(from = %from, "Note moved out of the vault");
                    Some(VaultEvent::Deleted(from))
                }
            }
        }

        EventKind::Remove(_) => {
            let note = vault.note_id_for(paths.first()?)?;
            debug!(note = %note, "Mapped Remove event");
            Some(VaultEvent::Deleted(note))
        }

        _ => None,
    }
}

// ============================================================================
// Following events
// ============================================================================

/// Applies vault events to the registry until the channel closes
///
/// A rename or delete that names a registered note is applied to that note.
/// Otherwise the path is treated as a folder and every registered note
/// below it is moved or cleared. Failures are logged and do not stop the
/// loop.
pub async fn follow_vault_events(mut rx: mpsc::Receiver<VaultEvent>, registry: TargetRegistry) {
    info!("Following vault lifecycle events");
    while let Some(event) = rx.recv().await {
        // The settings file may have been edited by the CLI since the last event.
        if let Err(e) = registry.reload().await {
            warn!(error = %e, "Failed to reload settings, applying event to cached targets");
        }
        if let Err(e) = apply_vault_event(&registry, &event).await {
            warn!(event = ?event, error = %e, "Failed to apply vault event");
        }
    }
    info!("Vault event channel closed");
}

/// Applies a single vault event to the registry
pub async fn apply_vault_event(registry: &TargetRegistry, event: &VaultEvent) -> Result<()> {
    let targets = registry.all_targets().await;
    match event {
        VaultEvent::Renamed { from, to } => {
            if targets.contains_key(from) {
                return registry.on_renamed(from, to).await;
            }
            for note in targets.keys() {
                if let Some(moved) = rebase(note, from, to) {
                    registry.on_renamed(note, &moved).await?;
                }
            }
        }
        VaultEvent::Deleted(removed) => {
            if targets.contains_key(removed) {
                return registry.on_deleted(removed).await;
            }
            for note in targets.keys().filter(|n| is_below(n, removed)) {
                registry.on_deleted(note).await?;
            }
        }
    }
    Ok(())
}

/// True if `note` lies inside the folder `dir`
fn is_below(note: &NoteId, dir: &NoteId) -> bool {
    note.as_str()
        .strip_prefix(dir.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Moves `note` from folder `from` to folder `to`, if it lies inside `from`
fn rebase(note: &NoteId, from: &NoteId, to: &NoteId) -> Option<NoteId> {
    let rest = note.as_str().strip_prefix(from.as_str())?;
    if !rest.starts_with('/') {
        return None;
    }
    NoteId::new(format!("{}{}", to.as_str(), rest)).ok()
}
