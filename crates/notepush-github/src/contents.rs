//! Repository contents operations
//!
//! Implements the two calls a sync needs:
//!
//! - `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` to read the
//!   current blob sha of a file (404 means the file does not exist yet)
//! - `PUT /repos/{owner}/{repo}/contents/{path}` to create or replace a file
//!   in one commit, with the previous sha as the optimistic concurrency token

use notepush_core::domain::SyncTarget;
use notepush_core::ports::{FileWrite, WriteReceipt};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::client::{error_from_response, GitHubClient};
use crate::GitHubError;

/// File entry returned by the contents GET endpoint
///
/// A directory lookup returns an array instead and fails to parse.
#[derive(Debug, Deserialize)]
struct ContentsFile {
    sha: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Response body of the contents PUT endpoint
#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<ShaRef>,
    commit: Option<ShaRef>,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: Option<String>,
}

/// Looks up the blob sha of the target file on its branch
///
/// # Returns
/// `Ok(None)` when the API answers 404, `Ok(Some(sha))` when the file exists.
pub async fn get_file_sha(
    client: &GitHubClient,
    token: &str,
    target: &SyncTarget,
) -> Result<Option<String>, GitHubError> {
    let mut url = client.contents_url(&target.owner, &target.repo, &target.file_path)?;
    url.query_pairs_mut().append_pair("ref", &target.branch);
    debug!(target = %target, "Fetching remote file revision");

    let response = client.request(Method::GET, url, token).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        debug!(target = %target, "Remote file does not exist");
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let body = response.text().await?;
    let file: ContentsFile = serde_json::from_str(&body).map_err(|e| {
        GitHubError::InvalidResponse(format!(
            "{} is not a file: {e}",
            target.file_path
        ))
    })?;
    if let Some(kind) = file.kind.as_deref().filter(|k| *k != "file") {
        return Err(GitHubError::InvalidResponse(format!(
            "{} is a {kind}, not a file",
            target.file_path
        )));
    }

    debug!(target = %target, sha = %file.sha, "Remote file exists");
    Ok(Some(file.sha))
}

/// Creates or replaces the target file in a single commit
///
/// A missing `sha` in `write` asks the API to create the file; a present one
/// must match the current blob or the API rejects the write (409/422).
pub async fn put_file(
    client: &GitHubClient,
    token: &str,
    target: &SyncTarget,
    write: &FileWrite,
) -> Result<WriteReceipt, GitHubError> {
    let url = client.contents_url(&target.owner, &target.repo, &target.file_path)?;
    debug!(
        target = %target,
        update = write.sha.is_some(),
        bytes = write.content.len(),
        "Writing remote file"
    );

    let response = client
        .request(Method::PUT, url, token)
        .json(write)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let body = response.text().await?;
    let parsed: PutResponse = serde_json::from_str(&body)
        .map_err(|e| GitHubError::InvalidResponse(format!("unexpected PUT response: {e}")))?;

    Ok(WriteReceipt {
        content_sha: parsed.content.and_then(|c| c.sha),
        commit_sha: parsed.commit.and_then(|c| c.sha),
    })
}
