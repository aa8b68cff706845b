//! Integration tests for GitHubContentStore as an IRemoteStore
//!
//! Exercises the port contract the sync use case relies on: absent files
//! report `Absent`, existing files report their sha, and write failures
//! keep the classified GitHub error as their source.

use notepush_core::ports::{FileWrite, IRemoteStore, RemoteFileState};
use notepush_github::provider::GitHubContentStore;
use notepush_github::GitHubError;

use crate::common::{self, TEST_TOKEN};

const PAGE_PATH: &str = "/repos/alice/notes/contents/docs/page.md";

#[tokio::test]
async fn test_file_state_absent() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_missing_file(&server, PAGE_PATH).await;
    let store = GitHubContentStore::new(client);

    let state = store
        .file_state(TEST_TOKEN, &common::page_target())
        .await
        .unwrap();

    assert_eq!(state, RemoteFileState::Absent);
}

#[tokio::test]
async fn test_file_state_present() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_existing_file(&server, PAGE_PATH, "main", "deadbeef").await;
    let store = GitHubContentStore::new(client);

    let state = store
        .file_state(TEST_TOKEN, &common::page_target())
        .await
        .unwrap();

    assert_eq!(state.sha(), Some("deadbeef"));
}

#[tokio::test]
async fn test_create_then_update_flow() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_put_ok(&server, PAGE_PATH, 201).await;
    let store = GitHubContentStore::new(client);

    let receipt = store
        .put_file(
            TEST_TOKEN,
            &common::page_target(),
            &FileWrite {
                message: "Sync page".to_string(),
                content: "aGVsbG8=".to_string(),
                branch: "main".to_string(),
                sha: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(receipt.content_sha.as_deref(), Some("new-blob-sha"));
    assert_eq!(receipt.commit_sha.as_deref(), Some("new-commit-sha"));
}

#[tokio::test]
async fn test_write_error_keeps_github_error_source() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_put_error(&server, PAGE_PATH, 409, "sha mismatch").await;
    let store = GitHubContentStore::new(client);

    let err = store
        .put_file(
            TEST_TOKEN,
            &common::page_target(),
            &FileWrite {
                message: "Sync page".to_string(),
                content: "aGVsbG8=".to_string(),
                branch: "main".to_string(),
                sha: Some("stale".to_string()),
            },
        )
        .await
        .unwrap_err();

    let github_err = err
        .downcast_ref::<GitHubError>()
        .expect("source should be a GitHubError");
    assert!(github_err.is_stale_revision());
}
