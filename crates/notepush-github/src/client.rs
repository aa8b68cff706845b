//! GitHub REST API client
//!
//! Provides a typed HTTP client for the GitHub REST API. Handles the
//! authentication and media-type headers, per-segment URL construction, and
//! classification of error responses into [`GitHubError`].
//!
//! The client holds no credential; the access token is supplied per request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notepush_github::client::GitHubClient;
//! use reqwest::Method;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GitHubClient::new()?;
//! let url = client.contents_url("alice", "notes", "docs/page.md")?;
//! let response = client.request(Method::GET, url, "ghp_token").send().await?;
//! println!("status: {}", response.status());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use notepush_core::config::{GitHubConfig, DEFAULT_API_URL};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::GitHubError;

/// Media type requested from the API
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every request
const GITHUB_API_VERSION: &str = "2022-11-28";

/// User-Agent sent on every request (GitHub rejects requests without one)
const USER_AGENT: &str = concat!("notepush/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the API on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ============================================================================
// GitHubClient
// ============================================================================

/// HTTP client for GitHub REST API calls
///
/// Wraps `reqwest::Client` with the default headers and base URL handling
/// needed for the contents endpoints.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: Url,
}

impl GitHubClient {
    /// Creates a client for the public GitHub API
    pub fn new() -> Result<Self, GitHubError> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Creates a client with a custom base URL (GitHub Enterprise or tests)
    ///
    /// # Arguments
    /// * `base_url` - Base URL for API requests, e.g. `https://ghe.example.com/api/v3`
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, GitHubError> {
        Self::build(base_url.as_ref(), None)
    }

    /// Creates a client from the `github` settings section
    pub fn from_config(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let timeout = match config.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::build(&config.api_url, timeout)
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, GitHubError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GitHubError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        debug!(base_url = %base_url, ?timeout, "Created GitHub client");
        Ok(Self { client, base_url })
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/repos/{owner}/{repo}/contents/{path}`
    ///
    /// Every segment is percent-encoded on its own, so characters such as
    /// spaces, `#` and `?` in file names survive; `/` in `file_path`
    /// separates segments.
    pub fn contents_url(
        &self,
        owner: &str,
        repo: &str,
        file_path: &str,
    ) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(file_path.split('/'));
        Ok(url)
    }

    /// Creates an authenticated request builder for the given method and URL
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, PUT, ...)
    /// * `url` - Absolute request URL, usually from [`GitHubClient::contents_url`]
    /// * `token` - Access token sent as a bearer credential
    pub fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(token)
    }
}

// ============================================================================
// Error classification
// ============================================================================

/// Converts a non-success response into a [`GitHubError`]
///
/// Reads the body to extract GitHub's `message` field when present.
pub async fn error_from_response(response: Response) -> GitHubError {
    let status = response.status();
    let retry_after = retry_after(&response);
    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);

    classify_status(status, message, retry_after, rate_limited)
}

/// Maps an HTTP status and message onto a [`GitHubError`] variant
pub fn classify_status(
    status: StatusCode,
    message: String,
    retry_after: Option<Duration>,
    rate_limited: bool,
) -> GitHubError {
    match status {
        StatusCode::UNAUTHORIZED => GitHubError::Unauthorized(message),
        StatusCode::FORBIDDEN if rate_limited => GitHubError::TooManyRequests { retry_after },
        StatusCode::FORBIDDEN => GitHubError::Forbidden(message),
        StatusCode::NOT_FOUND => GitHubError::NotFound(message),
        StatusCode::CONFLICT => GitHubError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => GitHubError::Unprocessable(message),
        StatusCode::TOO_MANY_REQUESTS => GitHubError::TooManyRequests { retry_after },
        s if s.is_server_error() => GitHubError::ServerError { status: s, message },
        s => GitHubError::InvalidResponse(format!("unexpected status {s}: {message}")),
    }
}

/// Parses a `Retry-After` header given in seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_uses_default_base() {
        let client = GitHubClient::new().unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            GitHubClient::with_base_url("not a url"),
            Err(GitHubError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            GitHubClient::with_base_url("mailto:someone@example.com"),
            Err(GitHubError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_contents_url_simple() {
        let client = GitHubClient::new().unwrap();
        let url = client.contents_url("alice", "notes", "docs/page.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/alice/notes/contents/docs/page.md"
        );
    }

    #[test]
    fn test_contents_url_encodes_each_segment() {
        let client = GitHubClient::new().unwrap();
        let url = client
            .contents_url("alice", "notes", "My Notes/café #1?.md")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/alice/notes/contents/My%20Notes/caf%C3%A9%20%231%3F.md"
        );
    }

    #[test]
    fn test_contents_url_keeps_base_path() {
        let client = GitHubClient::with_base_url("https://ghe.example.com/api/v3/").unwrap();
        let url = client.contents_url("o", "r", "a.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/contents/a.md"
        );
    }

    #[test]
    fn test_request_builder_sets_headers() {
        let client = GitHubClient::with_base_url("http://localhost:8080").unwrap();
        let url = client.contents_url("o", "r", "a.md").unwrap();
        let request = client.request(Method::GET, url, "test-token").build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/repos/o/r/contents/a.md"
        );
        let auth_header = request
            .headers()
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(auth_header, "Bearer test-token");
    }

    #[test]
    fn test_from_config_accepts_timeout() {
        let config = GitHubConfig {
            access_token: None,
            api_url: "http://localhost:1".to_string(),
            request_timeout_secs: 5,
        };
        let client = GitHubClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:1/");
    }

    #[test]
    fn test_classify_status() {
        let m = || "m".to_string();
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, m(), None, false),
            GitHubError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, m(), None, false),
            GitHubError::Forbidden(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, m(), None, true),
            GitHubError::TooManyRequests { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, m(), None, false),
            GitHubError::NotFound(_)
        ));
        assert!(classify_status(StatusCode::CONFLICT, m(), None, false).is_stale_revision());
        assert!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, m(), None, false)
                .is_stale_revision()
        );
        assert!(matches!(
            classify_status(
                StatusCode::TOO_MANY_REQUESTS,
                m(),
                Some(Duration::from_secs(3)),
                false
            ),
            GitHubError::TooManyRequests {
                retry_after: Some(d)
            } if d == Duration::from_secs(3)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, m(), None, false),
            GitHubError::ServerError { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::IM_A_TEAPOT, m(), None, false),
            GitHubError::InvalidResponse(_)
        ));
    }
}
