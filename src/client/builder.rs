use crate::client::core::ChatClient;
use crate::storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Builder for creating clients with custom configuration.
///
/// Explicit values win over environment variables, which win over defaults:
/// - `AFIRA_API_URL` (default `http://localhost:5000`)
/// - `AFIRA_HTTP_TIMEOUT_SECS` (default: no timeout)
/// - `AFIRA_PROXY_URL` (read by the transport)
pub struct ChatClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl ChatClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            store: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout. Without one a hung server hangs the caller.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Inject the store that holds the user identifier. Default is an
    /// in-memory store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn file_store(self, path: impl Into<PathBuf>) -> Self {
        self.store(Arc::new(FileStore::new(path)))
    }

    pub fn keyring_store(self) -> Self {
        self.store(Arc::new(KeyringStore::new()))
    }

    fn resolve_base_url(&self) -> Result<String> {
        let raw = self
            .base_url
            .clone()
            .or_else(|| std::env::var("AFIRA_API_URL").ok().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let raw = raw.trim().to_string();

        let parsed = url::Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL '{}'", raw),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string())
                    .with_source("client_builder"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported scheme '{}'", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_source("client_builder"),
            ));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }

    fn resolve_timeout(&self) -> Result<Option<Duration>> {
        if self.timeout.is_some() {
            return Ok(self.timeout);
        }
        match std::env::var("AFIRA_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    Error::configuration_with_context(
                        format!("invalid timeout '{}'", raw),
                        ErrorContext::new()
                            .with_field_path("AFIRA_HTTP_TIMEOUT_SECS")
                            .with_details(e.to_string()),
                    )
                })?;
                Ok(Some(Duration::from_secs(secs)).filter(|d| !d.is_zero()))
            }
            Err(_) => Ok(None),
        }
    }

    /// Build the client.
    pub fn build(self) -> Result<ChatClient> {
        let base_url = self.resolve_base_url()?;
        let timeout = self.resolve_timeout()?;
        let transport = Arc::new(HttpTransport::new(&base_url, timeout)?);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        Ok(ChatClient {
            transport,
            store,
            server_ready: AtomicBool::new(false),
            user_id: RwLock::new(None),
            user_id_init: tokio::sync::Mutex::new(()),
        })
    }
}

impl Default for ChatClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_url_is_normalized() {
        let client = ChatClientBuilder::new()
            .base_url("http://10.0.0.5:5000/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:5000");
    }

    #[test]
    fn invalid_base_url_is_configuration_error() {
        let err = ChatClientBuilder::new()
            .base_url("not a url")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("base_url")
        );
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = ChatClientBuilder::new()
            .base_url("ftp://localhost:5000")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn explicit_timeout_wins() {
        let builder = ChatClientBuilder::new().timeout(Duration::from_secs(3));
        assert_eq!(
            builder.resolve_timeout().unwrap(),
            Some(Duration::from_secs(3))
        );
    }
}
