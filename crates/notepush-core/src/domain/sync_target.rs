//! Sync targets and URL target parsing
//!
//! A [`SyncTarget`] names the remote file a note's content is pushed to.
//! Targets are created from a URL pasted by the user, in one of two shapes:
//!
//! - `https://github.com/{owner}/{repo}/blob/{branch}/{path...}`
//! - `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path...}`
//!
//! Parsing is purely syntactic; no network access happens here.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::DomainError;

/// Host of the repository web UI
const GITHUB_HOST: &str = "github.com";

/// Host serving raw file content
const RAW_HOST: &str = "raw.githubusercontent.com";

/// Marker segment separating `{owner}/{repo}` from `{branch}/{path}` on github.com
const BLOB_MARKER: &str = "blob";

/// Remote destination for one note's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    /// Repository owner (user or organisation)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch the content is committed to
    pub branch: String,
    /// Slash-separated path inside the repository, no leading slash
    pub file_path: String,
    /// The URL the target was created from, kept for display and editing
    pub source_url: String,
}

impl SyncTarget {
    /// Parses a pasted remote file URL into a target
    ///
    /// Each path segment is percent-decoded on its own before it is stored.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTargetUrl`] when the input is not a URL,
    /// the host is not recognized, the path has too few segments, or a
    /// `github.com` URL lacks the `blob` marker.
    pub fn from_url(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| DomainError::InvalidTargetUrl(format!("{trimmed}: {e}")))?;

        let segments: Vec<String> = url
            .path_segments()
            .map(|segs| {
                segs.filter(|s| !s.is_empty())
                    .map(decode_segment)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let (owner, repo, branch, path) = match url.host_str() {
            Some(GITHUB_HOST) => {
                if segments.len() < 5 || segments[2] != BLOB_MARKER {
                    return Err(DomainError::InvalidTargetUrl(format!(
                        "{trimmed}: expected github.com/{{owner}}/{{repo}}/blob/{{branch}}/{{path}}"
                    )));
                }
                (&segments[0], &segments[1], &segments[3], &segments[4..])
            }
            Some(RAW_HOST) => {
                if segments.len() < 4 {
                    return Err(DomainError::InvalidTargetUrl(format!(
                        "{trimmed}: expected raw.githubusercontent.com/{{owner}}/{{repo}}/{{branch}}/{{path}}"
                    )));
                }
                (&segments[0], &segments[1], &segments[2], &segments[3..])
            }
            _ => {
                return Err(DomainError::InvalidTargetUrl(format!(
                    "{trimmed}: unsupported host"
                )))
            }
        };

        Ok(Self {
            owner: owner.clone(),
            repo: repo.clone(),
            branch: branch.clone(),
            file_path: path.join("/"),
            source_url: trimmed.to_string(),
        })
    }

    /// `owner/repo`
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Checks the non-empty field invariants
    ///
    /// Targets produced by [`SyncTarget::from_url`] always pass; this exists
    /// for targets loaded from a hand-edited settings file.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch", &self.branch),
            ("file_path", &self.file_path),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(DomainError::ValidationFailed(format!("{name} is empty")));
            }
        }
        if self.file_path.starts_with('/') {
            return Err(DomainError::ValidationFailed(format!(
                "file_path must not start with '/': {}",
                self.file_path
            )));
        }
        Ok(())
    }
}

impl Display for SyncTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.owner, self.repo, self.file_path, self.branch
        )
    }
}

fn decode_segment(segment: &str) -> Result<String, DomainError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| DomainError::InvalidTargetUrl(format!("bad percent-encoding in {segment}: {e}")))
}
