//! End-to-end sync tests
//!
//! Runs the real vault and settings-file adapters on a temporary directory
//! against a wiremock-backed GitHub contents API.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use notepush_core::domain::{NoteId, SyncError, SyncTarget};
use notepush_core::ports::{ISettingsStore, VaultEvent};
use notepush_core::usecases::{SettingsState, TargetRegistry};
use notepush_github::client::GitHubClient;
use notepush_github::provider::GitHubContentStore;
use notepush_sync::watcher::apply_vault_event;
use notepush_sync::{FileSystemVault, SyncEngine, TracingNotifier, YamlSettingsStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    _dir: TempDir,
    server: MockServer,
    store: Arc<YamlSettingsStore>,
    registry: TargetRegistry,
    engine: SyncEngine,
}

fn note(s: &str) -> NoteId {
    NoteId::new(s).unwrap()
}

async fn fixture(notes: &[(&str, &str)], token: Option<&str>) -> Fixture {
    let dir = TempDir::new().unwrap();
    let vault_root = dir.path().join("vault");
    for (id, text) in notes {
        let p = vault_root.join(id);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, text).unwrap();
    }

    let store = Arc::new(YamlSettingsStore::new(dir.path().join("config/config.yaml")));
    let state = Arc::new(SettingsState::load(store.clone()).await.unwrap());
    let registry = TargetRegistry::new(state);

    let server = MockServer::start().await;
    let remote = GitHubContentStore::new(GitHubClient::with_base_url(server.uri()).unwrap());

    let engine = SyncEngine::new(
        registry.clone(),
        Arc::new(FileSystemVault::new(vault_root)),
        Arc::new(remote),
        Arc::new(TracingNotifier::new()),
        token.map(str::to_string),
    );

    Fixture {
        _dir: dir,
        server,
        store,
        registry,
        engine,
    }
}

async fn set_target(fx: &Fixture, id: &str, url: &str) {
    fx.registry
        .set_target(&note(id), SyncTarget::from_url(url).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_batch_creates_and_updates_remote_files() {
    let fx = fixture(
        &[("new.md", "brand new"), ("daily/old.md", "updated text")],
        Some("tok"),
    )
    .await;
    set_target(&fx, "new.md", "https://github.com/alice/notes/blob/main/new.md").await;
    set_target(
        &fx,
        "daily/old.md",
        "https://raw.githubusercontent.com/alice/notes/main/journal/old.md",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repos/alice/notes/contents/new.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/notes/contents/journal/old.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"type": "file", "sha": "prev-sha"})),
        )
        .mount(&fx.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": {"sha": "s"}, "commit": {"sha": "c"}
        })))
        .expect(2)
        .mount(&fx.server)
        .await;

    let summary = fx.engine.sync_all().await;
    assert_eq!(summary.succeeded, 2, "outcomes: {:?}", summary.outcomes);
    assert_eq!(summary.failed, 0);

    let puts: Vec<serde_json::Value> = fx
        .server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();

    let update = puts
        .iter()
        .find(|b| b["sha"] == "prev-sha")
        .expect("update carries the fetched sha");
    assert_eq!(update["content"], BASE64.encode("updated text"));
    assert_eq!(update["branch"], "main");
    assert!(update["message"].as_str().unwrap().starts_with("Sync old at "));

    let create = puts
        .iter()
        .find(|b| b.get("sha").is_none())
        .expect("create omits sha");
    assert_eq!(create["content"], BASE64.encode("brand new"));
}

#[tokio::test]
async fn test_missing_note_and_failed_lookup_do_not_stop_batch() {
    let fx = fixture(&[("a.md", "a"), ("c.md", "c")], Some("tok")).await;
    set_target(&fx, "a.md", "https://github.com/o/r/blob/main/a.md").await;
    set_target(&fx, "b.md", "https://github.com/o/r/blob/main/b.md").await;
    set_target(&fx, "c.md", "https://github.com/o/r/blob/main/c.md").await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/a.md"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents/c.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&fx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/o/r/contents/c.md"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "content": {"sha": "s"}, "commit": {"sha": "c"}
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let summary = fx.engine.sync_all().await;

    assert_eq!((summary.succeeded, summary.failed), (1, 2));
    let kinds: Vec<&str> = summary
        .outcomes
        .iter()
        .map(|o| o.error.as_ref().map_or("ok", SyncError::kind))
        .collect();
    assert_eq!(kinds, vec!["remote_read_failed", "note_unreadable", "ok"]);

    let b_requests = fx
        .server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().ends_with("/b.md"))
        .count();
    assert_eq!(b_requests, 0, "unreadable note must not reach the remote");
}

#[tokio::test]
async fn test_stale_sha_rejection_is_write_failure() {
    let fx = fixture(&[("a.md", "a")], Some("tok")).await;
    set_target(&fx, "a.md", "https://github.com/o/r/blob/main/a.md").await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"type": "file", "sha": "old"})),
        )
        .mount(&fx.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(serde_json::json!({"message": "a.md does not match old"})),
        )
        .expect(1)
        .mount(&fx.server)
        .await;

    let err = fx.engine.try_sync_one(&note("a.md")).await.unwrap_err();
    match err {
        SyncError::RemoteWriteFailed { location, reason } => {
            assert_eq!(location, "o/r/a.md@main");
            assert!(reason.contains("does not match"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_token_makes_no_requests() {
    let fx = fixture(&[("a.md", "a")], None).await;
    set_target(&fx, "a.md", "https://github.com/o/r/blob/main/a.md").await;

    let outcome = fx.engine.sync_one(&note("a.md")).await;

    assert_eq!(outcome.error, Some(SyncError::MissingCredential));
    assert!(fx.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_registry_changes_are_persisted() {
    let fx = fixture(&[], Some("tok")).await;
    set_target(&fx, "a.md", "https://github.com/o/r/blob/main/a.md").await;
    set_target(&fx, "dir/b.md", "https://github.com/o/r/blob/main/b.md").await;

    apply_vault_event(
        &fx.registry,
        &VaultEvent::Renamed {
            from: note("a.md"),
            to: note("renamed.md"),
        },
    )
    .await
    .unwrap();
    apply_vault_event(&fx.registry, &VaultEvent::Deleted(note("dir")))
        .await
        .unwrap();

    let on_disk = fx.store.load().await.unwrap();
    let keys: Vec<String> = on_disk.targets.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["renamed.md"]);
    assert_eq!(on_disk.targets[&note("renamed.md")].file_path, "a.md");
}
