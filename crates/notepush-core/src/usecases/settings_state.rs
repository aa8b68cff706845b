//! Shared, persisted settings state
//!
//! Holds the in-memory copy of [`Settings`] together with the store it is
//! persisted to. Every mutation runs under one lock: the change is applied
//! to a copy, the copy is saved, and only a successful save replaces the
//! in-memory value. Readers never observe a change that failed to persist.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::ports::ISettingsStore;

/// In-memory settings backed by an [`ISettingsStore`]
pub struct SettingsState {
    current: Mutex<Settings>,
    store: Arc<dyn ISettingsStore>,
}

impl SettingsState {
    /// Wraps already-loaded settings
    pub fn new(settings: Settings, store: Arc<dyn ISettingsStore>) -> Self {
        Self {
            current: Mutex::new(settings),
            store,
        }
    }

    /// Loads settings from the store and wraps them
    pub async fn load(store: Arc<dyn ISettingsStore>) -> Result<Self> {
        let settings = store.load().await.context("Failed to load settings")?;
        Ok(Self::new(settings, store))
    }

    /// Returns a copy of the current settings
    pub async fn snapshot(&self) -> Settings {
        self.current.lock().await.clone()
    }

    /// Reads a value out of the current settings without cloning all of it
    pub async fn read<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        let guard = self.current.lock().await;
        f(&guard)
    }

    /// Applies `f` to a copy of the settings, persists it, then publishes it
    ///
    /// If `f` returns an error nothing is saved. If the save fails the
    /// in-memory settings are left unchanged and the error is returned.
    pub async fn update<T>(&self, f: impl FnOnce(&mut Settings) -> Result<T>) -> Result<T> {
        let mut guard = self.current.lock().await;
        let mut next = guard.clone();
        let value = f(&mut next)?;
        if next != *guard {
            self.store
                .save(&next)
                .await
                .context("Failed to save settings")?;
            *guard = next;
        }
        Ok(value)
    }

    /// Re-reads settings from the store, replacing the in-memory copy
    pub async fn reload(&self) -> Result<()> {
        let fresh = self.store.load().await.context("Failed to reload settings")?;
        *self.current.lock().await = fresh;
        Ok(())
    }
}
