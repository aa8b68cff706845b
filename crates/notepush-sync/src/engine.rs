//! Note synchronization engine
//!
//! The [`SyncEngine`] pushes notes from the local vault to their configured
//! remote files and reports the results through the notification port.
//!
//! ## Sync Flow
//!
//! 1. **Single note** ([`SyncEngine::sync_one`]): resolve the target, read the
//!    note, look up the remote revision, create or update the remote file,
//!    notify the user of the result.
//! 2. **Batch** ([`SyncEngine::sync_all`]): snapshot the registry and run the
//!    single-note flow for each entry in order. A failing note is counted and
//!    the batch moves on; one summary notification is sent at the end.
//!
//! Nothing is retried. A failed note is picked up again by the next batch.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use notepush_core::domain::{BatchSummary, NoteId, SyncError, SyncOutcome};
use notepush_core::ports::{
    INotificationService, IRemoteStore, IVault, Notification, NotificationPriority, WriteReceipt,
};
use notepush_core::usecases::{SyncNoteUseCase, TargetRegistry};

/// Pushes notes to their remote targets and reports the results
pub struct SyncEngine {
    usecase: SyncNoteUseCase,
    notifier: Arc<dyn INotificationService>,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` with the given dependencies
    ///
    /// # Arguments
    /// * `registry` - Note targets
    /// * `vault` - Local note storage (IVault)
    /// * `remote` - Versioned remote file store (IRemoteStore)
    /// * `notifier` - Where results are reported (INotificationService)
    /// * `credential` - Access token for the remote store, if any
    pub fn new(
        registry: TargetRegistry,
        vault: Arc<dyn IVault>,
        remote: Arc<dyn IRemoteStore>,
        notifier: Arc<dyn INotificationService>,
        credential: Option<String>,
    ) -> Self {
        Self {
            usecase: SyncNoteUseCase::new(registry, vault, remote, credential),
            notifier,
        }
    }

    /// The registry the engine reads targets from
    pub fn registry(&self) -> &TargetRegistry {
        self.usecase.registry()
    }

    /// Synchronizes one note and returns the error directly on failure
    ///
    /// No notification is sent; callers that surface errors themselves
    /// (e.g. the CLI) use this.
    #[tracing::instrument(skip(self), fields(note = %note))]
    pub async fn try_sync_one(&self, note: &NoteId) -> Result<WriteReceipt, SyncError> {
        self.usecase.try_sync_one(note).await
    }

    /// Synchronizes one note and notifies the user of the result
    #[tracing::instrument(skip(self), fields(note = %note))]
    pub async fn sync_one(&self, note: &NoteId) -> SyncOutcome {
        let outcome = self.run_one(note).await;
        self.notify(&outcome_notification(&outcome)).await;
        outcome
    }

    /// Synchronizes every note that has a target
    ///
    /// Notes are processed sequentially in registry order. Per-note failures
    /// are recorded in the summary and never abort the batch.
    #[tracing::instrument(skip(self))]
    pub async fn sync_all(&self) -> BatchSummary {
        let start = Instant::now();
        let notes: Vec<NoteId> = self.registry().all_targets().await.into_keys().collect();
        info!(count = notes.len(), "Starting batch sync");

        let mut summary = BatchSummary::default();
        for note in &notes {
            summary.record(self.run_one(note).await);
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "Batch sync completed"
        );

        self.notify(&summary_notification(&summary)).await;
        summary
    }

    async fn run_one(&self, note: &NoteId) -> SyncOutcome {
        match self.usecase.try_sync_one(note).await {
            Ok(_) => SyncOutcome::success(note.clone()),
            Err(e) => {
                warn!(note = %note, kind = e.kind(), error = %e, "Note sync failed");
                SyncOutcome::failure(note.clone(), e)
            }
        }
    }

    async fn notify(&self, notification: &Notification) {
        if let Err(e) = self.notifier.notify(notification).await {
            warn!(error = %e, title = %notification.title, "Failed to deliver notification");
        }
    }
}

/// Notification for a single-note result
pub fn outcome_notification(outcome: &SyncOutcome) -> Notification {
    let name = outcome.note.display_name();
    match &outcome.error {
        None => Notification::sync("Note synced", format!("{name} pushed to GitHub"))
            .with_priority(NotificationPriority::Low),
        Some(SyncError::MissingCredential) => Notification::config(
            "GitHub token missing",
            "Set a token with `notepush auth set-token` or in the settings file",
        ),
        Some(e @ (SyncError::NoTargetConfigured(_) | SyncError::InvalidTarget { .. })) => {
            Notification::config("No sync target", e.to_string())
        }
        Some(e) => Notification::error(format!("Sync of {name} failed"), e.to_string()),
    }
}

/// Notification for a finished batch
pub fn summary_notification(summary: &BatchSummary) -> Notification {
    if summary.failed == 0 {
        Notification::sync("Sync complete", summary.message())
    } else {
        let mut body = summary.message();
        for outcome in summary.failures() {
            if let Some(e) = &outcome.error {
                body.push_str(&format!("\n{}: {e}", outcome.note));
            }
        }
        Notification::error("Sync finished with errors", body)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use notepush_core::config::Settings;
    use notepush_core::domain::SyncTarget;
    use notepush_core::ports::{FileWrite, ISettingsStore, RemoteFileState};
    use notepush_core::usecases::SettingsState;

    use super::*;

    // ------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------

    struct NullStore;

    #[async_trait::async_trait]
    impl ISettingsStore for NullStore {
        async fn load(&self) -> Result<Settings> {
            Ok(Settings::default())
        }
        async fn save(&self, _settings: &Settings) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MapVault(HashMap<NoteId, String>);

    #[async_trait::async_trait]
    impl IVault for MapVault {
        async fn read_note(&self, note: &NoteId) -> Result<String> {
            self.0.get(note).cloned().ok_or_else(|| anyhow!("missing"))
        }
        async fn exists(&self, note: &NoteId) -> bool {
            self.0.contains_key(note)
        }
        async fn list_notes(&self) -> Result<Vec<NoteId>> {
            Ok(self.0.keys().cloned().collect())
        }
    }

    /// Remote that fails reads for file paths listed in `broken`
    #[derive(Default)]
    struct FakeRemote {
        broken: Vec<String>,
        puts: Mutex<Vec<(String, FileWrite)>>,
    }

    #[async_trait::async_trait]
    impl IRemoteStore for FakeRemote {
        async fn file_state(&self, _credential: &str, target: &SyncTarget) -> Result<RemoteFileState> {
            if self.broken.contains(&target.file_path) {
                return Err(anyhow!("Server error (500): boom"));
            }
            Ok(RemoteFileState::Absent)
        }

        async fn put_file(
            &self,
            _credential: &str,
            target: &SyncTarget,
            write: &FileWrite,
        ) -> Result<WriteReceipt> {
            self.puts
                .lock()
                .unwrap()
                .push((target.file_path.clone(), write.clone()));
            Ok(WriteReceipt::default())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Notification>>);

    #[async_trait::async_trait]
    impl INotificationService for RecordingNotifier {
        async fn notify(&self, notification: &Notification) -> Result<()> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn note(s: &str) -> NoteId {
        NoteId::new(s).unwrap()
    }

    struct Harness {
        engine: SyncEngine,
        remote: Arc<FakeRemote>,
        notifier: Arc<RecordingNotifier>,
    }

    async fn harness(
        targets: &[&str],
        notes: &[&str],
        broken: &[&str],
        credential: Option<&str>,
    ) -> Harness {
        let state = SettingsState::new(Settings::default(), Arc::new(NullStore));
        let registry = TargetRegistry::new(Arc::new(state));
        for t in targets {
            let target =
                SyncTarget::from_url(&format!("https://github.com/o/r/blob/main/{t}")).unwrap();
            registry.set_target(&note(t), target).await.unwrap();
        }
        let vault = MapVault(
            notes
                .iter()
                .map(|n| (note(n), format!("content of {n}")))
                .collect(),
        );
        let remote = Arc::new(FakeRemote {
            broken: broken.iter().map(|s| s.to_string()).collect(),
            ..FakeRemote::default()
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = SyncEngine::new(
            registry,
            Arc::new(vault),
            remote.clone(),
            notifier.clone(),
            credential.map(str::to_string),
        );
        Harness {
            engine,
            remote,
            notifier,
        }
    }

    // ------------------------------------------------------------------
    // sync_one
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_one_success_notifies() {
        let h = harness(&["a.md"], &["a.md"], &[], Some("tok")).await;

        let outcome = h.engine.sync_one(&note("a.md")).await;

        assert!(outcome.is_success());
        let sent = h.notifier.0.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].category, "sync");
    }

    #[tokio::test]
    async fn test_sync_one_missing_credential_is_config_warning() {
        let h = harness(&["a.md"], &["a.md"], &[], None).await;

        let outcome = h.engine.sync_one(&note("a.md")).await;

        assert_eq!(outcome.error, Some(SyncError::MissingCredential));
        let sent = h.notifier.0.lock().unwrap().clone();
        assert_eq!(sent[0].category, "config");
        assert!(h.remote.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_try_sync_one_returns_error_without_notifying() {
        let h = harness(&[], &["a.md"], &[], Some("tok")).await;

        let err = h.engine.try_sync_one(&note("a.md")).await.unwrap_err();

        assert!(matches!(err, SyncError::NoTargetConfigured(_)));
        assert!(h.notifier.0.lock().unwrap().is_empty());
    }

    // ------------------------------------------------------------------
    // sync_all
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_all_empty_registry() {
        let h = harness(&[], &[], &[], Some("tok")).await;

        let summary = h.engine.sync_all().await;

        assert_eq!(summary.total(), 0);
        let sent = h.notifier.0.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "No notes have a sync target");
    }

    #[tokio::test]
    async fn test_sync_all_counts_failures_and_continues() {
        let h = harness(
            &["a.md", "b.md", "c.md"],
            &["a.md", "c.md"],
            &["c.md"],
            Some("tok"),
        )
        .await;

        let summary = h.engine.sync_all().await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.outcomes.len(), 3);
        assert!(matches!(
            summary.outcomes[1].error,
            Some(SyncError::NoteUnreadable { .. })
        ));
        assert!(matches!(
            summary.outcomes[2].error,
            Some(SyncError::RemoteReadFailed { .. })
        ));

        let puts = h.remote.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "a.md");

        let sent = h.notifier.0.lock().unwrap().clone();
        assert_eq!(sent.len(), 1, "batch sends one summary only");
        assert_eq!(sent[0].category, "error");
        assert!(sent[0].body.starts_with("Synced 1 note, 2 failed"));
        assert!(sent[0].body.contains("b.md"));
    }

    #[tokio::test]
    async fn test_sync_all_success_summary() {
        let h = harness(&["a.md", "b.md"], &["a.md", "b.md"], &[], Some("tok")).await;

        let summary = h.engine.sync_all().await;

        assert_eq!(summary.succeeded, 2);
        let sent = h.notifier.0.lock().unwrap().clone();
        assert_eq!(sent[0].title, "Sync complete");
        assert_eq!(sent[0].body, "Synced 2 notes");
    }

    #[test]
    fn test_outcome_notification_for_remote_failure() {
        let outcome = SyncOutcome::failure(
            note("dir/page.md"),
            SyncError::RemoteWriteFailed {
                location: "o/r/page.md@main".into(),
                reason: "409".into(),
            },
        );
        let n = outcome_notification(&outcome);
        assert_eq!(n.title, "Sync of page failed");
        assert_eq!(n.priority, NotificationPriority::High);
    }
}
