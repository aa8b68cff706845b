//! GitHubContentStore - IRemoteStore implementation for the GitHub contents API
//!
//! Wraps the [`GitHubClient`] and delegates to the [`contents`](crate::contents)
//! module to fulfil the [`IRemoteStore`] port contract.
//!
//! ## Design Notes
//!
//! - The store holds no credential; the token arrives with each call.
//! - A 404 on lookup becomes [`RemoteFileState::Absent`]; every other
//!   failure is returned as an error with the [`GitHubError`] as its source.
//! - Nothing is retried here.

use anyhow::Result;
use tracing::warn;

use notepush_core::config::GitHubConfig;
use notepush_core::domain::SyncTarget;
use notepush_core::ports::{FileWrite, IRemoteStore, RemoteFileState, WriteReceipt};

use crate::client::GitHubClient;
use crate::contents;
use crate::GitHubError;

/// Remote store backed by a GitHub repository
#[derive(Debug, Clone)]
pub struct GitHubContentStore {
    client: GitHubClient,
}

impl GitHubContentStore {
    /// Creates a new `GitHubContentStore` wrapping the given [`GitHubClient`]
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Creates a store from the `github` settings section
    pub fn from_config(config: &GitHubConfig) -> Result<Self, GitHubError> {
        Ok(Self::new(GitHubClient::from_config(config)?))
    }

    /// The underlying client
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IRemoteStore for GitHubContentStore {
    async fn file_state(&self, credential: &str, target: &SyncTarget) -> Result<RemoteFileState> {
        let sha = contents::get_file_sha(&self.client, credential, target).await?;
        Ok(match sha {
            Some(sha) => RemoteFileState::Present { sha },
            None => RemoteFileState::Absent,
        })
    }

    async fn put_file(
        &self,
        credential: &str,
        target: &SyncTarget,
        write: &FileWrite,
    ) -> Result<WriteReceipt> {
        contents::put_file(&self.client, credential, target, write)
            .await
            .map_err(|e| {
                if e.is_stale_revision() {
                    warn!(target = %target, "Remote rejected write with stale revision");
                }
                anyhow::Error::new(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_store_creation() {
        let store = GitHubContentStore::from_config(&GitHubConfig::default()).unwrap();
        assert_eq!(store.client().base_url().as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_content_store_rejects_bad_api_url() {
        let config = GitHubConfig {
            api_url: "::".to_string(),
            ..GitHubConfig::default()
        };
        assert!(GitHubContentStore::from_config(&config).is_err());
    }
}
