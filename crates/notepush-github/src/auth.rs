//! Access token storage for the GitHub API
//!
//! ## Components
//!
//! - [`KeyringCredentialStore`] - Secure token storage using the system keyring
//! - [`resolve_access_token`] - Picks the token a sync run should use

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Service name used for keyring entries
const KEYRING_SERVICE: &str = "notepush";

/// Default keyring account holding the GitHub token
const DEFAULT_ACCOUNT: &str = "github";

/// Stores and retrieves the GitHub access token from the system keyring
///
/// Uses the `keyring` crate to store the token in the OS credential store
/// (e.g., GNOME Keyring, KDE Wallet, macOS Keychain) under the service
/// name "notepush".
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    account: String,
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT)
    }
}

impl KeyringCredentialStore {
    /// Creates a store for the given keyring account name
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    /// Keyring account name used by this store
    pub fn account(&self) -> &str {
        &self.account
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account).context("Failed to create keyring entry")
    }

    /// Stores the token, replacing any previous one
    pub fn store(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("Refusing to store an empty access token");
        }
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keyring")?;
        debug!(account = %self.account, "Stored access token in keyring");
        Ok(())
    }

    /// Loads the token
    ///
    /// # Returns
    /// `Some(token)` if found, `None` if no token has been stored
    pub fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => {
                debug!(account = %self.account, "Loaded access token from keyring");
                Ok(Some(token))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(account = %self.account, "No access token in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    /// Removes the token; a missing token is not an error
    pub fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) => {
                info!(account = %self.account, "Cleared access token from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!(account = %self.account, "No access token to clear");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}

/// Where the access token of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `github.access_token` in the settings file
    Settings,
    /// The system keyring
    Keyring,
}

/// Resolves the access token: the settings value wins, then the keyring
///
/// Keyring failures are logged and treated as "no token" so that the sync
/// reports a missing credential instead of aborting.
pub fn resolve_access_token(
    configured: Option<&str>,
    keyring: &KeyringCredentialStore,
) -> Option<(String, TokenSource)> {
    if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        return Some((token.to_string(), TokenSource::Settings));
    }
    match keyring.load() {
        Ok(token) => token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| (t, TokenSource::Keyring)),
        Err(e) => {
            warn!(error = %e, "Could not read access token from keyring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_account() {
        assert_eq!(KeyringCredentialStore::default().account(), "github");
        assert_eq!(KeyringCredentialStore::new("work").account(), "work");
    }

    #[test]
    fn test_store_rejects_empty_token() {
        let store = KeyringCredentialStore::new("notepush-test-empty");
        assert!(store.store("   ").is_err());
    }

    #[test]
    fn test_configured_token_wins() {
        let store = KeyringCredentialStore::new("notepush-test-unused");
        let resolved = resolve_access_token(Some(" ghp_abc "), &store);
        assert_eq!(resolved, Some(("ghp_abc".to_string(), TokenSource::Settings)));
    }
}
