//! Remote store port (driven/secondary port)
//!
//! This module defines the interface for the versioned remote file store
//! that note content is pushed to. The primary implementation targets the
//! GitHub contents API, but the trait only speaks in terms of revision
//! markers and whole-file writes.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific;
//!   the sync use case maps them into `SyncError` variants.
//! - The access credential is passed per call so that the caller decides
//!   whether one is configured before any request is built.
//! - "Not found" is not an error for [`IRemoteStore::file_state`]; it is
//!   reported as [`RemoteFileState::Absent`].

use serde::{Deserialize, Serialize};

use crate::domain::SyncTarget;

/// Current state of a remote file, fetched fresh for every sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFileState {
    /// No file exists at the target location
    Absent,
    /// The file exists at the given revision marker
    Present {
        /// Opaque revision marker (blob sha)
        sha: String,
    },
}

impl RemoteFileState {
    /// Revision marker, if the file exists
    pub fn sha(&self) -> Option<&str> {
        match self {
            RemoteFileState::Absent => None,
            RemoteFileState::Present { sha } => Some(sha),
        }
    }
}

/// A create-or-replace write of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWrite {
    /// Commit message
    pub message: String,
    /// Base64 of the file's UTF-8 bytes
    pub content: String,
    /// Branch to commit to
    pub branch: String,
    /// Revision being replaced; `None` creates a new file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// What the remote store reports back after a successful write
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WriteReceipt {
    /// Revision marker of the written file
    pub content_sha: Option<String>,
    /// Identifier of the commit that carried the write
    pub commit_sha: Option<String>,
}

/// Port trait for the versioned remote file store
///
/// ## Implementation Notes
///
/// - Implementations must not retry internally; a failed call is reported
///   to the caller as-is.
/// - `put_file` must be all-or-nothing: either the full content lands under
///   a new revision or the remote file is left untouched.
/// - A stale `sha` in [`FileWrite`] must surface as an error, never as a
///   silent overwrite.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Looks up the current revision of the target file
    ///
    /// # Arguments
    /// * `credential` - Access token for the remote API
    /// * `target` - Location to look up
    async fn file_state(
        &self,
        credential: &str,
        target: &SyncTarget,
    ) -> anyhow::Result<RemoteFileState>;

    /// Creates or replaces the target file
    ///
    /// # Arguments
    /// * `credential` - Access token for the remote API
    /// * `target` - Location to write
    /// * `write` - Content, branch, message and optional revision marker
    async fn put_file(
        &self,
        credential: &str,
        target: &SyncTarget,
        write: &FileWrite,
    ) -> anyhow::Result<WriteReceipt>;
}
