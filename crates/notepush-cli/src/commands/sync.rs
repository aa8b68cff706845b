//! Sync command - Push notes to their GitHub targets
//!
//! `notepush sync` runs a batch over every note with a target and prints the
//! summary. `notepush sync <NOTE>` pushes one note and reports its error
//! directly.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use notepush_core::domain::{BatchSummary, NoteId};
use notepush_core::ports::INotificationService;
use notepush_core::usecases::TargetRegistry;
use notepush_github::provider::GitHubContentStore;
use notepush_sync::{FileSystemVault, SyncEngine, TracingNotifier};
use tracing::info;

use super::{resolve_credential, token_source_name, CliContext};
use crate::output::{format_duration, plural, ConsoleNotifier};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Vault-relative path of a single note to sync (default: all targeted notes)
    pub note: Option<String>,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let state = ctx.settings_state().await?;
        let settings = state.snapshot().await;

        let credential = match resolve_credential(&settings) {
            Some((token, source)) => {
                info!(source = token_source_name(source), "Using GitHub access token");
                Some(token)
            }
            None => None,
        };

        let remote = GitHubContentStore::from_config(&settings.github)
            .context("Failed to create GitHub client")?;
        let vault = FileSystemVault::new(settings.vault_root());

        // JSON output is printed once at the end; notifications go to the log.
        let notifier: Arc<dyn INotificationService> = if ctx.is_json() {
            Arc::new(TracingNotifier::new())
        } else {
            Arc::new(ConsoleNotifier::new(ctx.formatter()))
        };

        let engine = SyncEngine::new(
            TargetRegistry::new(state),
            Arc::new(vault),
            Arc::new(remote),
            notifier,
            credential,
        );

        match &self.note {
            Some(note) => self.sync_single(ctx, &engine, note).await,
            None => self.sync_batch(ctx, &engine).await,
        }
    }

    async fn sync_single(&self, ctx: &CliContext, engine: &SyncEngine, note: &str) -> Result<()> {
        let note = NoteId::new(note)?;
        let formatter = ctx.formatter();

        let receipt = engine.try_sync_one(&note).await?;
        let target = engine.registry().target(&note).await;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "note": note.as_str(),
                "target": target.as_ref().map(|t| t.to_string()),
                "content_sha": receipt.content_sha,
                "commit_sha": receipt.commit_sha,
            }));
        } else {
            match target {
                Some(t) => formatter.success(&format!("Synced {note} to {t}")),
                None => formatter.success(&format!("Synced {note}")),
            }
            if let Some(commit) = &receipt.commit_sha {
                formatter.info(&format!("Commit: {commit}"));
            }
        }
        Ok(())
    }

    async fn sync_batch(&self, ctx: &CliContext, engine: &SyncEngine) -> Result<()> {
        let formatter = ctx.formatter();
        if engine.registry().all_targets().await.is_empty() {
            if ctx.is_json() {
                formatter.print_json(&serde_json::to_value(BatchSummary::default())?);
            } else {
                formatter.info("No notes have a sync target. Add one with 'notepush target set'.");
            }
            return Ok(());
        }

        formatter.info("Starting synchronization...");
        let summary = engine.sync_all().await;

        if ctx.is_json() {
            formatter.print_json(
                &serde_json::to_value(&summary).context("Failed to serialize sync summary")?,
            );
        } else {
            formatter.info(&format!("Completed in {}", format_duration(summary.duration_ms)));
        }

        if summary.failed > 0 {
            anyhow::bail!("{} failed to sync", plural(u64::from(summary.failed), "note"));
        }
        Ok(())
    }
}
