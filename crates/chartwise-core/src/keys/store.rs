//! The key store: validated get/save/clear over a [`KeyBackend`].

use super::backend::{FileBackend, KeyBackend};
use super::credential::{self, ProviderKind};
use crate::error::KeyError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Which providers currently have a stored key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    pub gemini: bool,
    pub perplexity: bool,
}

impl KeyStatus {
    pub fn has(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Gemini => self.gemini,
            ProviderKind::Perplexity => self.perplexity,
        }
    }
}

/// Validated credential storage with change notification.
///
/// Reads never fail: an unreadable backend is treated as "no key" and logged.
/// Writes validate first, so a rejected key leaves storage untouched.
pub struct KeyStore {
    backend: Box<dyn KeyBackend>,
    status_tx: watch::Sender<KeyStatus>,
}

impl KeyStore {
    /// Create a store over any backend.
    pub fn new(backend: Box<dyn KeyBackend>) -> Self {
        let (status_tx, _) = watch::channel(KeyStatus::default());
        let store = Self { backend, status_tx };
        store.publish();
        store
    }

    /// Create a store backed by the TOML credentials file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileBackend::new(path)))
    }

    /// Read the stored key for `provider`.
    pub fn get(&self, provider: ProviderKind) -> Option<String> {
        match self.backend.load(provider.spec().storage_key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not read {provider} key: {e}");
                None
            }
        }
    }

    /// Whether a key is stored for `provider`.
    pub fn has(&self, provider: ProviderKind) -> bool {
        self.get(provider).is_some()
    }

    /// Validate, trim, and persist a key.
    pub fn save(&self, provider: ProviderKind, raw: &str) -> Result<(), KeyError> {
        let key = credential::validate(provider, raw)?;
        self.backend.store(provider.spec().storage_key, &key)?;
        tracing::info!("Saved {provider} key {}", credential::mask(&key));
        self.publish();
        Ok(())
    }

    /// Remove the key for `provider`. Succeeds when nothing is stored.
    pub fn clear(&self, provider: ProviderKind) -> Result<(), KeyError> {
        self.backend.remove(provider.spec().storage_key)?;
        tracing::debug!("Cleared {provider} key");
        self.publish();
        Ok(())
    }

    /// Remove every stored key.
    pub fn clear_all(&self) -> Result<(), KeyError> {
        for provider in ProviderKind::ALL {
            self.backend.remove(provider.spec().storage_key)?;
        }
        tracing::debug!("Cleared all keys");
        self.publish();
        Ok(())
    }

    /// Current configured state of both providers.
    pub fn status(&self) -> KeyStatus {
        KeyStatus {
            gemini: self.has(ProviderKind::Gemini),
            perplexity: self.has(ProviderKind::Perplexity),
        }
    }

    /// Subscribe to key changes. The receiver starts at the current status.
    pub fn subscribe(&self) -> watch::Receiver<KeyStatus> {
        self.status_tx.subscribe()
    }

    /// Where keys are persisted, if on disk.
    pub fn location(&self) -> Option<&Path> {
        self.backend.location()
    }

    fn publish(&self) {
        let status = self.status();
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
