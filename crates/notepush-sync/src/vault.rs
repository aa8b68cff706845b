//! Local vault adapter (secondary/driven adapter)
//!
//! Implements [`IVault`] over a directory of Markdown notes using `tokio::fs`.
//!
//! ## Design Decisions
//!
//! - **Ids are relative paths**: a note's [`NoteId`] is its path below the
//!   vault root with `/` separators, independent of the host platform.
//! - **Hidden entries skipped**: dot-directories (`.git`, `.obsidian`, ...)
//!   and dot-files are never listed.
//! - **Text only**: notes must be valid UTF-8; anything else is a read error.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use notepush_core::domain::NoteId;
use notepush_core::ports::IVault;
use tracing::{debug, instrument, warn};

/// File extension of notes
const NOTE_EXTENSION: &str = "md";

/// Adapter that bridges the [`IVault`] port to a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSystemVault {
    root: PathBuf,
}

impl FileSystemVault {
    /// Create a vault rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a note.
    pub fn path_for(&self, note: &NoteId) -> PathBuf {
        note.as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Maps an absolute path inside the vault to its note id.
    ///
    /// Returns `None` for paths outside the vault, the root itself, hidden
    /// entries, and names that are not valid UTF-8.
    pub fn note_id_for(&self, path: &Path) -> Option<NoteId> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str()?;
                    if name.starts_with('.') {
                        return None;
                    }
                    segments.push(name);
                }
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        NoteId::new(segments.join("/")).ok()
    }

    /// Returns true if `path` names a note file (by extension).
    pub fn is_note_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTE_EXTENSION))
    }
}

#[async_trait::async_trait]
impl IVault for FileSystemVault {
    #[instrument(skip(self), fields(note = %note))]
    async fn read_note(&self, note: &NoteId) -> anyhow::Result<String> {
        let path = self.path_for(note);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(bytes = bytes.len(), "note read complete");
        String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
    }

    async fn exists(&self, note: &NoteId) -> bool {
        match tokio::fs::metadata(self.path_for(note)).await {
            Ok(metadata) => metadata.is_file(),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(note = %note, error = %e, "Cannot stat note");
                }
                false
            }
        }
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn list_notes(&self) -> anyhow::Result<Vec<NoteId>> {
        let mut notes = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && Self::is_note_path(&path) {
                    if let Some(id) = self.note_id_for(&path) {
                        notes.push(id);
                    }
                }
            }
        }

        notes.sort();
        debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }
}
