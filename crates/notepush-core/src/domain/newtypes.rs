//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// NoteId
// ============================================================================

/// Identifier of a note: its vault-relative, `/`-separated path
///
/// A `NoteId` names a note at a point in time; renaming the note yields a
/// new id. Ids are never absolute and never escape the vault root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Create a new NoteId
    ///
    /// # Errors
    /// Returns error if the path is empty, absolute, contains empty
    /// components, or contains a `..` component
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();

        if path.is_empty() {
            return Err(DomainError::InvalidNoteId("note id is empty".to_string()));
        }

        if path.starts_with('/') {
            return Err(DomainError::InvalidNoteId(format!(
                "note id must be vault-relative: {path}"
            )));
        }

        if path.contains('\\') {
            return Err(DomainError::InvalidNoteId(format!(
                "note id must use '/' separators: {path}"
            )));
        }

        for component in path.split('/') {
            if component.is_empty() {
                return Err(DomainError::InvalidNoteId(format!(
                    "note id contains an empty component: {path}"
                )));
            }
            if component == ".." || component == "." {
                return Err(DomainError::InvalidNoteId(format!(
                    "note id contains invalid traversal: {path}"
                )));
            }
        }

        Ok(Self(path))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component (e.g. `page.md`)
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Name shown to users: the file name without its extension
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NoteId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
