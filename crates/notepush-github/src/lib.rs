//! notepush GitHub - GitHub contents API adapter
//!
//! Provides async client for:
//! - Looking up the current revision (blob sha) of a repository file
//! - Creating or replacing a repository file in a single commit
//! - Storing the access token in the system keyring
//!
//! ## Modules
//!
//! - [`auth`] - Keyring-backed access token storage
//! - [`client`] - GitHub REST API HTTP client
//! - [`contents`] - Contents endpoint operations (GET revision, PUT file)
//! - [`provider`] - `IRemoteStore` implementation over the client

pub mod auth;
pub mod client;
pub mod contents;
pub mod provider;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the GitHub REST API
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The access token is missing, invalid, or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks permission for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The repository, branch, or file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The supplied revision is stale (the file changed remotely)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was well-formed but rejected (e.g. sha mismatch, bad branch)
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Rate limit exceeded
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Hint from the `Retry-After` header, if present
        retry_after: Option<Duration>,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status returned
        status: StatusCode,
        /// Message from the response body
        message: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The configured API base URL cannot be used to build request URLs
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GitHubError {
    /// Returns true if the error is a stale-revision rejection
    pub fn is_stale_revision(&self) -> bool {
        matches!(self, GitHubError::Conflict(_) | GitHubError::Unprocessable(_))
    }
}
