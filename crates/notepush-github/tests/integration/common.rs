//! Shared test helpers for GitHub API integration tests
//!
//! Provides wiremock-based mock server setup for the contents endpoints.
//! Each helper mounts the necessary mock endpoints on a server created by
//! [`setup_github_mock`].

use notepush_core::domain::SyncTarget;
use notepush_github::client::GitHubClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the helpers expect on every request
pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a (MockServer, GitHubClient) tuple
pub async fn setup_github_mock() -> (MockServer, GitHubClient) {
    let server = MockServer::start().await;
    let client = GitHubClient::with_base_url(server.uri()).expect("mock server URI is valid");
    (server, client)
}

/// Target used by most tests: alice/notes, branch main, docs/page.md
pub fn page_target() -> SyncTarget {
    SyncTarget::from_url("https://github.com/alice/notes/blob/main/docs/page.md")
        .expect("valid target URL")
}

/// Mounts a GET that reports the file exists at `sha`
pub async fn mount_existing_file(server: &MockServer, api_path: &str, branch: &str, sha: &str) {
    Mock::given(method("GET"))
        .and(path(api_path))
        .and(query_param("ref", branch))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "file",
            "name": api_path.rsplit('/').next().unwrap_or_default(),
            "sha": sha,
            "size": 5,
            "encoding": "base64",
            "content": "aGVsbG8=\n"
        })))
        .mount(server)
        .await;
}

/// Mounts a GET that answers 404
pub async fn mount_missing_file(server: &MockServer, api_path: &str) {
    Mock::given(method("GET"))
        .and(path(api_path))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/contents#get-repository-content"
        })))
        .mount(server)
        .await;
}

/// Mounts a PUT that accepts any body and returns new shas
pub async fn mount_put_ok(server: &MockServer, api_path: &str, status: u16) {
    Mock::given(method("PUT"))
        .and(path(api_path))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "content": {"name": "page.md", "path": "docs/page.md", "sha": "new-blob-sha"},
            "commit": {"sha": "new-commit-sha", "message": "Sync page"}
        })))
        .mount(server)
        .await;
}

/// Mounts a PUT that rejects the write with `status` and a GitHub error body
pub async fn mount_put_error(server: &MockServer, api_path: &str, status: u16, message: &str) {
    Mock::given(method("PUT"))
        .and(path(api_path))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "message": message
        })))
        .mount(server)
        .await;
}
