//! OS credential store backend.

use super::backend::KeyValueStore;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use keyring::Entry;

const DEFAULT_SERVICE: &str = "afira-client";

/// Keeps each key as a separate credential entry under one service name.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|e| keyring_error(e, key))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

fn keyring_error(e: keyring::Error, key: &str) -> Error {
    Error::storage_with_context(
        e.to_string(),
        ErrorContext::new()
            .with_field_path(key)
            .with_source("keyring_store"),
    )
}

// A missing credential is an empty slot, not a failure.
fn read_outcome(outcome: keyring::Result<String>, key: &str) -> Result<Option<String>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e, key)),
    }
}

fn remove_outcome(outcome: keyring::Result<()>, key: &str) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(keyring_error(e, key)),
    }
}

#[async_trait]
impl KeyValueStore for KeyringStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        read_outcome(self.entry(key)?.get_password(), key)
    }
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| keyring_error(e, key))
    }
    async fn remove(&self, key: &str) -> Result<bool> {
        remove_outcome(self.entry(key)?.delete_password(), key)
    }
    fn name(&self) -> &'static str {
        "keyring"
    }
}
