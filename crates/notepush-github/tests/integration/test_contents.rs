//! Integration tests for the contents operations
//!
//! Verifies revision lookup and file writes against a wiremock-based
//! GitHub API mock server.

use notepush_core::domain::SyncTarget;
use notepush_core::ports::FileWrite;
use notepush_github::{contents, GitHubError};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::common::{self, TEST_TOKEN};

const PAGE_PATH: &str = "/repos/alice/notes/contents/docs/page.md";

fn write(sha: Option<&str>) -> FileWrite {
    FileWrite {
        message: "Sync page at 2024-01-01T00:00:00Z".to_string(),
        content: "aGVsbG8=".to_string(),
        branch: "main".to_string(),
        sha: sha.map(str::to_string),
    }
}

// ============================================================================
// GET revision
// ============================================================================

#[tokio::test]
async fn test_get_file_sha_existing() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_existing_file(&server, PAGE_PATH, "main", "abc123").await;

    let sha = contents::get_file_sha(&client, TEST_TOKEN, &common::page_target())
        .await
        .expect("lookup failed");

    assert_eq!(sha.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_get_file_sha_missing_is_none() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_missing_file(&server, PAGE_PATH).await;

    let sha = contents::get_file_sha(&client, TEST_TOKEN, &common::page_target())
        .await
        .expect("404 must not be an error");

    assert!(sha.is_none());
}

#[tokio::test]
async fn test_get_file_sha_server_error() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = contents::get_file_sha(&client, TEST_TOKEN, &common::page_target())
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::ServerError { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_get_file_sha_unauthorized() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let err = contents::get_file_sha(&client, "wrong", &common::page_target())
        .await
        .unwrap_err();

    match err {
        GitHubError::Unauthorized(message) => assert_eq!(message, "Bad credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_file_sha_directory_is_invalid() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "file", "name": "a.md", "sha": "1"}
        ])))
        .mount(&server)
        .await;

    let err = contents::get_file_sha(&client, TEST_TOKEN, &common::page_target())
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_requests_carry_github_headers() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "file", "sha": "s1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    contents::get_file_sha(&client, TEST_TOKEN, &common::page_target())
        .await
        .expect("lookup failed");

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0]
        .headers
        .get("user-agent")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(agent.starts_with("notepush/"));
}

#[tokio::test]
async fn test_path_segments_encoded_individually() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let target =
        SyncTarget::from_url("https://github.com/alice/notes/blob/dev/My%20Notes/caf%C3%A9%20%231.md")
            .unwrap();
    assert_eq!(target.file_path, "My Notes/café #1.md");

    let sha = contents::get_file_sha(&client, TEST_TOKEN, &target)
        .await
        .unwrap();
    assert!(sha.is_none());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/repos/alice/notes/contents/My%20Notes/caf%C3%A9%20%231.md"
    );
    assert_eq!(requests[0].url.query(), Some("ref=dev"));
}

// ============================================================================
// PUT file
// ============================================================================

#[tokio::test]
async fn test_put_file_create_omits_sha() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(PAGE_PATH))
        .and(body_json(serde_json::json!({
            "message": "Sync page at 2024-01-01T00:00:00Z",
            "content": "aGVsbG8=",
            "branch": "main"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "content": {"sha": "blob-1"},
            "commit": {"sha": "commit-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = contents::put_file(&client, TEST_TOKEN, &common::page_target(), &write(None))
        .await
        .expect("create failed");

    assert_eq!(receipt.content_sha.as_deref(), Some("blob-1"));
    assert_eq!(receipt.commit_sha.as_deref(), Some("commit-1"));
}

#[tokio::test]
async fn test_put_file_update_sends_sha() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(PAGE_PATH))
        .and(body_json(serde_json::json!({
            "message": "Sync page at 2024-01-01T00:00:00Z",
            "content": "aGVsbG8=",
            "branch": "main",
            "sha": "abc123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": {"sha": "blob-2"},
            "commit": {"sha": "commit-2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = contents::put_file(
        &client,
        TEST_TOKEN,
        &common::page_target(),
        &write(Some("abc123")),
    )
    .await
    .expect("update failed");

    assert_eq!(receipt.commit_sha.as_deref(), Some("commit-2"));
}

#[tokio::test]
async fn test_put_file_stale_sha_conflict() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_put_error(&server, PAGE_PATH, 409, "docs/page.md does not match abc123").await;

    let err = contents::put_file(
        &client,
        TEST_TOKEN,
        &common::page_target(),
        &write(Some("abc123")),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, GitHubError::Conflict(_)));
    assert!(err.is_stale_revision());
    assert!(err.to_string().contains("does not match"));
}

#[tokio::test]
async fn test_put_file_missing_sha_unprocessable() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_put_error(&server, PAGE_PATH, 422, "\"sha\" wasn't supplied.").await;

    let err = contents::put_file(&client, TEST_TOKEN, &common::page_target(), &write(None))
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::Unprocessable(_)));
}

#[tokio::test]
async fn test_put_file_rate_limited() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "60"))
        .mount(&server)
        .await;

    let err = contents::put_file(&client, TEST_TOKEN, &common::page_target(), &write(None))
        .await
        .unwrap_err();

    match err {
        GitHubError::TooManyRequests { retry_after } => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(60)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
