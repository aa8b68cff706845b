//! notepush daemon - Background note synchronization service
//!
//! This binary runs as a user service and handles:
//! - A batch sync at startup (`sync.on_startup`)
//! - Recurring batch syncs every `sync.interval_minutes`
//! - Following note renames and deletions in the vault
//! - An immediate batch sync on SIGUSR1
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The [`SyncScheduler`] emits triggers on a channel; a single loop consumes
//! them and runs one batch at a time, so daemon batches never overlap. The
//! loop and the scheduler are controlled by a `CancellationToken` that is
//! triggered on receipt of SIGTERM or SIGINT and checked between batches.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notepush_core::config::Settings;
use notepush_core::domain::BatchSummary;
use notepush_core::usecases::{SettingsState, TargetRegistry};
use notepush_github::auth::{resolve_access_token, KeyringCredentialStore, TokenSource};
use notepush_github::provider::GitHubContentStore;
use notepush_sync::{
    follow_vault_events, FileSystemVault, SyncEngine, SyncRequester, SyncScheduler, SyncTrigger,
    TracingNotifier, VaultWatcher, YamlSettingsStore,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "notepushd", version, about = "notepush background sync daemon")]
struct Args {
    /// Use alternate settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// DaemonService
// ============================================================================

/// Main daemon service that wires the settings, scheduler, and watcher
struct DaemonService {
    config_path: PathBuf,
    /// Shared settings, also holding the target registry
    state: Arc<SettingsState>,
    registry: TargetRegistry,
    /// Token for signalling graceful shutdown to all async tasks
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Loads the settings file and prepares shared state
    async fn new(config_path: PathBuf, shutdown: CancellationToken) -> Result<Self> {
        let store = Arc::new(YamlSettingsStore::new(config_path.clone()));
        let state = Arc::new(
            SettingsState::load(store)
                .await
                .with_context(|| format!("Failed to load {}", config_path.display()))?,
        );
        let registry = TargetRegistry::new(Arc::clone(&state));

        Ok(Self {
            config_path,
            state,
            registry,
            shutdown,
        })
    }

    /// Runs until shutdown
    ///
    /// 1. Reports settings problems
    /// 2. Starts the vault watcher and the event follower
    /// 3. Starts the scheduler
    /// 4. Runs one batch per trigger
    async fn run(&self) -> Result<()> {
        let settings = self.state.snapshot().await;
        info!(
            config_path = %self.config_path.display(),
            vault = %settings.vault_root().display(),
            targets = settings.targets.len(),
            "Loaded settings"
        );
        for problem in settings.validate() {
            warn!(field = %problem.field, "Invalid setting: {}", problem.message);
        }

        // Keep the watcher alive for the lifetime of the loop.
        let _watcher = self.start_watcher(&settings);

        let (scheduler, triggers) = SyncScheduler::new(&settings.sync);
        let scheduler_token = scheduler.cancellation_token();
        #[cfg(unix)]
        tokio::spawn(sync_on_user_signal(scheduler.requester(), self.shutdown.clone()));
        let scheduler_task = tokio::spawn(scheduler.run());

        if !settings.sync.on_startup && settings.sync.interval_minutes == 0 {
            info!("No automatic sync configured; only following vault renames and deletions");
        }

        self.sync_loop(triggers).await;

        scheduler_token.cancel();
        if let Err(e) = scheduler_task.await {
            warn!(error = %e, "Scheduler task ended abnormally");
        }
        Ok(())
    }

    /// Starts watching the vault; a failure disables rename following only
    fn start_watcher(&self, settings: &Settings) -> Option<VaultWatcher> {
        let root = settings.vault_root();
        let (mut watcher, events) = match VaultWatcher::new(&root) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(vault = %root.display(), error = %e, "Vault watcher unavailable");
                return None;
            }
        };
        if let Err(e) = watcher.watch() {
            warn!(vault = %root.display(), error = %e, "Failed to watch vault");
            return None;
        }
        tokio::spawn(follow_vault_events(events, self.registry.clone()));
        Some(watcher)
    }

    // ========================================================================
    // Trigger loop
    // ========================================================================

    /// Consumes triggers until shutdown or until the scheduler goes away
    async fn sync_loop(&self, mut triggers: mpsc::Receiver<SyncTrigger>) {
        info!("Starting sync loop");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
                trigger = triggers.recv() => match trigger {
                    Some(trigger) => {
                        self.run_batch(trigger).await;
                    }
                    None => {
                        info!("Trigger channel closed");
                        break;
                    }
                },
            }
        }
        info!("Sync loop terminated");
    }

    /// Runs one batch with the current settings
    ///
    /// Settings are re-read first so that targets and tokens changed through
    /// the CLI are used without a restart.
    async fn run_batch(&self, trigger: SyncTrigger) -> Option<BatchSummary> {
        info!(%trigger, "Starting sync cycle");

        if let Err(e) = self.state.reload().await {
            warn!(error = %e, "Failed to reload settings, using cached copy");
        }
        let settings = self.state.snapshot().await;

        let engine = match self.build_engine(&settings) {
            Ok(engine) => engine,
            Err(e) => {
                error!(error = %format!("{e:#}"), "Cannot start sync cycle");
                return None;
            }
        };

        let summary = engine.sync_all().await;
        info!(
            %trigger,
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "Sync cycle completed"
        );
        Some(summary)
    }

    fn build_engine(&self, settings: &Settings) -> Result<SyncEngine> {
        let credential = match resolve_access_token(
            settings.access_token(),
            &KeyringCredentialStore::default(),
        ) {
            Some((token, source)) => {
                debug!(
                    source = match source {
                        TokenSource::Settings => "settings",
                        TokenSource::Keyring => "keyring",
                    },
                    "Resolved access token"
                );
                Some(token)
            }
            None => None,
        };

        let remote = GitHubContentStore::from_config(&settings.github)
            .context("Failed to create GitHub client")?;

        Ok(SyncEngine::new(
            self.registry.clone(),
            Arc::new(FileSystemVault::new(settings.vault_root())),
            Arc::new(remote),
            Arc::new(TracingNotifier::new()),
            credential,
        ))
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

/// Requests an immediate sync on every SIGUSR1
#[cfg(unix)]
async fn sync_on_user_signal(requester: SyncRequester, shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut usr1 = match signal(SignalKind::user_defined1()) {
        Ok(signal) => signal,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGUSR1 handler; manual sync disabled");
            return;
        }
    };
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = usr1.recv() => {
                if received.is_none() {
                    break;
                }
                info!("Received SIGUSR1");
                requester.request_sync();
            }
        }
    }
}

/// `RUST_LOG` wins over the configured `logging.level`
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(Settings::default_path);

    let shutdown_token = CancellationToken::new();
    let service = DaemonService::new(config_path, shutdown_token.clone()).await?;

    let level = service.state.read(|s| s.logging.level.clone()).await;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&level))
        .with_target(true)
        .init();

    info!("notepush daemon starting (notepushd)");

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let result = service.run().await;

    match &result {
        Ok(()) => info!("notepush daemon shut down gracefully"),
        Err(e) => error!(error = %e, "notepush daemon exiting with error"),
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
