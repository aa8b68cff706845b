//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! validation failures for note identifiers and sync targets, and the
//! per-note synchronization failure taxonomy.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The URL does not describe a recognized remote file location
    #[error("Unrecognized target URL: {0}")]
    InvalidTargetUrl(String),

    /// Invalid note identifier
    #[error("Invalid note id: {0}")]
    InvalidNoteId(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Reasons a single note failed to synchronize
///
/// Every variant is confined to one note: a batch run converts these into
/// failure counts and carries on with the next note.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The note has no registry entry
    #[error("No sync target configured for {0}")]
    NoTargetConfigured(String),

    /// The stored target has an empty or malformed field
    #[error("Invalid sync target for {note}: {reason}")]
    InvalidTarget {
        /// The note whose target is invalid
        note: String,
        /// Which field failed
        reason: String,
    },

    /// No access credential is configured
    #[error("No GitHub access token configured")]
    MissingCredential,

    /// The note could not be read from the vault
    #[error("Cannot read note {note}: {reason}")]
    NoteUnreadable {
        /// The note that failed to read
        note: String,
        /// Underlying cause
        reason: String,
    },

    /// The revision lookup failed for a reason other than "not found"
    #[error("Failed to read remote file {location}: {reason}")]
    RemoteReadFailed {
        /// `owner/repo/path@branch`
        location: String,
        /// Underlying cause
        reason: String,
    },

    /// The create/update call was rejected or failed
    #[error("Failed to write remote file {location}: {reason}")]
    RemoteWriteFailed {
        /// `owner/repo/path@branch`
        location: String,
        /// Underlying cause
        reason: String,
    },
}

impl SyncError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::NoTargetConfigured(_) => "no_target_configured",
            SyncError::InvalidTarget { .. } => "invalid_target",
            SyncError::MissingCredential => "missing_credential",
            SyncError::NoteUnreadable { .. } => "note_unreadable",
            SyncError::RemoteReadFailed { .. } => "remote_read_failed",
            SyncError::RemoteWriteFailed { .. } => "remote_write_failed",
        }
    }
}
