//! Target commands - Manage which GitHub file each note is pushed to
//!
//! Subcommands:
//! - `set <NOTE> <URL>` - parse a GitHub file URL and store it for the note
//! - `clear <NOTE>`     - remove the note's target
//! - `show <NOTE>`      - print one target
//! - `list`             - print every target
//! - `rename <OLD> <NEW>` - move a target after the note was renamed

use anyhow::{Context, Result};
use clap::Subcommand;
use notepush_core::domain::{NoteId, SyncTarget};
use notepush_core::ports::IVault;
use notepush_core::usecases::TargetRegistry;
use notepush_sync::FileSystemVault;
use tracing::info;

use super::CliContext;

#[derive(Debug, Subcommand)]
pub enum TargetCommand {
    /// Set the GitHub file a note is pushed to
    Set {
        /// Vault-relative path of the note (e.g. "daily/2024-01-01.md")
        note: String,
        /// github.com blob URL or raw.githubusercontent.com URL
        url: String,
    },
    /// Remove a note's target
    Clear {
        note: String,
    },
    /// Show a note's target
    Show {
        note: String,
    },
    /// List all targets
    List,
    /// Move a target to a note's new path
    Rename {
        old: String,
        new: String,
    },
}

impl TargetCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            TargetCommand::Set { note, url } => execute_set(ctx, note, url).await,
            TargetCommand::Clear { note } => execute_clear(ctx, note).await,
            TargetCommand::Show { note } => execute_show(ctx, note).await,
            TargetCommand::List => execute_list(ctx).await,
            TargetCommand::Rename { old, new } => execute_rename(ctx, old, new).await,
        }
    }
}

fn target_json(note: &NoteId, target: &SyncTarget) -> serde_json::Value {
    serde_json::json!({
        "note": note.as_str(),
        "owner": target.owner,
        "repo": target.repo,
        "branch": target.branch,
        "file_path": target.file_path,
        "source_url": target.source_url,
    })
}

async fn execute_set(ctx: &CliContext, note: &str, url: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let note = NoteId::new(note)?;
    // A bad URL is rejected before the settings file is touched.
    let target = SyncTarget::from_url(url).context("Could not use this URL as a sync target")?;

    let state = ctx.settings_state().await?;
    let vault = FileSystemVault::new(state.read(|s| s.vault_root()).await);
    if !vault.exists(&note).await {
        formatter.warn(&format!(
            "{note} does not exist in {} yet",
            vault.root().display()
        ));
    }

    let registry = TargetRegistry::new(state);
    registry.set_target(&note, target.clone()).await?;
    info!(note = %note, target = %target, "Target set");

    if ctx.is_json() {
        formatter.print_json(&target_json(&note, &target));
    } else {
        formatter.success(&format!("{note} will sync to {target}"));
    }
    Ok(())
}

async fn execute_clear(ctx: &CliContext, note: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let note = NoteId::new(note)?;
    let removed = ctx.registry().await?.clear_target(&note).await?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({"note": note.as_str(), "removed": removed}));
    } else if removed {
        formatter.success(&format!("Cleared target of {note}"));
    } else {
        formatter.info(&format!("{note} has no target"));
    }
    Ok(())
}

async fn execute_show(ctx: &CliContext, note: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let note = NoteId::new(note)?;
    let Some(target) = ctx.registry().await?.target(&note).await else {
        anyhow::bail!("{note} has no sync target");
    };

    if ctx.is_json() {
        formatter.print_json(&target_json(&note, &target));
    } else {
        formatter.success(note.as_str());
        formatter.info(&format!("Repository: {}", target.repository()));
        formatter.info(&format!("Branch:     {}", target.branch));
        formatter.info(&format!("File:       {}", target.file_path));
        formatter.info(&format!("URL:        {}", target.source_url));
    }
    Ok(())
}

async fn execute_list(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let targets = ctx.registry().await?.all_targets().await;

    if ctx.is_json() {
        let items: Vec<_> = targets.iter().map(|(n, t)| target_json(n, t)).collect();
        formatter.print_json(&serde_json::Value::Array(items));
        return Ok(());
    }

    if targets.is_empty() {
        formatter.info("No targets configured");
        return Ok(());
    }
    let width = targets.keys().map(|n| n.as_str().len()).max().unwrap_or(0);
    for (note, target) in &targets {
        formatter.info(&format!("{:width$}  {}", note.as_str(), target));
    }
    Ok(())
}

async fn execute_rename(ctx: &CliContext, old: &str, new: &str) -> Result<()> {
    let formatter = ctx.formatter();
    let old = NoteId::new(old)?;
    let new = NoteId::new(new)?;
    let moved = ctx.registry().await?.rename_note(&old, &new).await?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "old": old.as_str(),
            "new": new.as_str(),
            "moved": moved,
        }));
    } else if moved {
        formatter.success(&format!("Moved target from {old} to {new}"));
    } else {
        formatter.info(&format!("{old} has no target"));
    }
    Ok(())
}
