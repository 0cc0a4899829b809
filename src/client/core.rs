use crate::client::user_id::generate_user_id;
use crate::storage::{KeyValueStore, USER_ID_KEY};
use crate::transport::{HttpTransport, TransportError};
use crate::types::{
    HealthStatus, PredictRequest, PredictResponse, ResetRequest, ResetResponse,
};
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

pub const GREETING: &str =
    "Hello! I'm Afira, your AI assistant powered by machine learning. Ask me anything!";

pub const NOT_READY_REPLY: &str =
    "Server is not ready. Please make sure the Flask API is running on port 5000.";

pub const APOLOGY_REPLY: &str =
    "Sorry, I couldn't process your message. Please check if the server is running.";

/// Client for the Afira inference server.
///
/// Holds the readiness flag of the last health check and the lazily
/// resolved user identifier. Every method performs at most one request;
/// nothing is retried or queued, and only first-time user id resolution is
/// serialized between overlapping calls.
pub struct ChatClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) server_ready: AtomicBool,
    pub(crate) user_id: RwLock<Option<String>>,
    // Held while the id is resolved from the store for the first time.
    pub(crate) user_id_init: tokio::sync::Mutex<()>,
}

impl ChatClient {
    /// Client with default configuration (env overrides applied).
    pub fn new() -> Result<Self> {
        crate::client::builder::ChatClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::ChatClientBuilder {
        crate::client::builder::ChatClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn cached_user_id(&self) -> Option<String> {
        match self.user_id.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Read-through cache: memory, then store, then generate-and-persist.
    ///
    /// Storage failures are logged and never surface. When the store cannot
    /// be read, a session-only id is cached and nothing is written, so a
    /// stored id is never overwritten. First-time resolution is serialized
    /// so overlapping callers agree with what the store holds.
    pub async fn get_user_id(&self) -> String {
        if let Some(id) = self.cached_user_id() {
            return id;
        }

        let _init = self.user_id_init.lock().await;
        if let Some(id) = self.cached_user_id() {
            return id;
        }

        let id = match self.store.get(USER_ID_KEY).await {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => {
                let id = generate_user_id();
                if let Err(e) = self.store.set(USER_ID_KEY, &id).await {
                    error!(store = self.store.name(), error = %e, "Failed to persist user id");
                }
                debug!(user_id = %id, "Generated new user id");
                id
            }
            Err(e) => {
                error!(store = self.store.name(), error = %e, "Failed to read user id");
                let id = generate_user_id();
                warn!(user_id = %id, "Using a session-only user id");
                id
            }
        };

        let mut guard = match self.user_id.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get_or_insert(id).clone()
    }

    pub async fn get_current_user_id(&self) -> String {
        self.get_user_id().await
    }

    /// Probe `GET /health` and update the readiness flag.
    ///
    /// Never fails: any transport or decode problem counts as not ready.
    pub async fn check_server_health(&self) -> bool {
        let ready = match self.fetch_health().await {
            Ok(health) => health.is_ready(),
            Err(e) => {
                error!(error = %e, "Server health check failed");
                false
            }
        };
        self.server_ready.store(ready, Ordering::SeqCst);
        ready
    }

    /// Raw `GET /health` body. Does not touch the readiness flag.
    pub async fn fetch_health(&self) -> Result<HealthStatus> {
        self.transport.get_json("/health").await
    }

    pub fn is_ready(&self) -> bool {
        self.server_ready.load(Ordering::SeqCst)
    }

    /// Check readiness and fail with [`Error::Unavailable`] when the server
    /// is down or its model is not loaded.
    pub async fn load_chat_data(&self) -> Result<()> {
        info!("Checking if ML server is ready...");
        if self.check_server_health().await {
            info!("ML Server is ready!");
            Ok(())
        } else {
            warn!("ML Server not available. Make sure Flask is running!");
            Err(Error::unavailable("ML Server not available"))
        }
    }

    pub fn get_greeting(&self) -> &'static str {
        GREETING
    }

    /// Relay one user message and return the server's reply.
    ///
    /// Never fails. Returns [`NOT_READY_REPLY`] without a request when the
    /// last health check was negative, and [`APOLOGY_REPLY`] on any request
    /// failure.
    pub async fn process_user_message(&self, message: &str) -> String {
        if !self.is_ready() {
            return NOT_READY_REPLY.to_string();
        }

        match self.predict(message).await {
            Ok(reply) => {
                info!("Intent: {}", reply.intent_summary());
                if reply.is_collecting_data() {
                    info!(
                        "Collecting data: {}",
                        reply.progress.as_deref().unwrap_or("in progress")
                    );
                }
                if let Some(prediction) = &reply.prediction {
                    info!(%prediction, "Prediction completed");
                }
                reply.response
            }
            Err(e) => {
                error!(error = %e, "Prediction error");
                APOLOGY_REPLY.to_string()
            }
        }
    }

    /// Raw `POST /predict`. Ignores the readiness flag.
    pub async fn predict(&self, message: &str) -> Result<PredictResponse> {
        let user_id = self.get_user_id().await;
        self.transport
            .post_json(
                "/predict",
                &PredictRequest {
                    message,
                    user_id: &user_id,
                },
            )
            .await
    }

    /// Ask the server to drop this user's session. Failures are logged only.
    pub async fn reset_conversation(&self) {
        info!("Resetting conversation and session...");
        let user_id = self.get_user_id().await;
        let result: Result<ResetResponse> = self
            .transport
            .post_json("/reset_session", &ResetRequest { user_id: &user_id })
            .await;
        match result {
            Ok(reply) => info!("{}", reply.message),
            Err(Error::Transport(TransportError::Status { status, .. })) => {
                debug!(%status, "Session reset rejected");
            }
            Err(e) => error!(error = %e, "Error resetting session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use crate::ErrorContext;
    use async_trait::async_trait;

    /// Store whose reads fail while writes still land in `inner`.
    struct UnreadableStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for UnreadableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage_with_context(
                "credential service locked",
                ErrorContext::new().with_source("unreadable_store"),
            ))
        }
        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }
        async fn remove(&self, key: &str) -> Result<bool> {
            self.inner.remove(key).await
        }
        fn name(&self) -> &'static str {
            "unreadable"
        }
    }

    fn offline_client(store: MemoryStore) -> ChatClient {
        // Nothing listens on port 9 (discard); requests fail fast.
        ChatClient::builder()
            .base_url("http://127.0.0.1:9")
            .store(Arc::new(store))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn user_id_is_generated_once_and_persisted() {
        let store = MemoryStore::new();
        let client = offline_client(store.clone());

        let first = client.get_user_id().await;
        assert!(crate::client::user_id::looks_generated(&first));
        assert_eq!(client.get_user_id().await, first);
        assert_eq!(client.get_current_user_id().await, first);
        assert_eq!(store.get(USER_ID_KEY).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn stored_user_id_is_returned_unchanged() {
        let store = MemoryStore::new();
        store.set(USER_ID_KEY, "user_existing42").await.unwrap();
        let client = offline_client(store);
        assert_eq!(client.get_user_id().await, "user_existing42");
    }

    #[tokio::test]
    async fn empty_stored_user_id_is_replaced() {
        let store = MemoryStore::new();
        store.set(USER_ID_KEY, "").await.unwrap();
        let client = offline_client(store.clone());
        let id = client.get_user_id().await;
        assert!(!id.is_empty());
        assert_eq!(store.get(USER_ID_KEY).await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn not_ready_by_default() {
        let client = offline_client(MemoryStore::new());
        assert!(!client.is_ready());
        assert_eq!(client.process_user_message("hi").await, NOT_READY_REPLY);
    }

    #[test]
    fn greeting_is_constant() {
        let client = offline_client(MemoryStore::new());
        assert_eq!(client.get_greeting(), GREETING);
    }

    #[tokio::test]
    async fn read_failure_does_not_overwrite_stored_id() {
        let inner = MemoryStore::new();
        inner.set(USER_ID_KEY, "user_original").await.unwrap();
        let client = ChatClient::builder()
            .base_url("http://127.0.0.1:9")
            .store(Arc::new(UnreadableStore {
                inner: inner.clone(),
            }))
            .build()
            .unwrap();

        let session_id = client.get_user_id().await;
        assert_ne!(session_id, "user_original");
        assert_eq!(client.get_user_id().await, session_id);
        assert_eq!(
            inner.get(USER_ID_KEY).await.unwrap().as_deref(),
            Some("user_original")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_first_calls_agree_with_store() {
        for _ in 0..20 {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            let client = Arc::new(
                ChatClient::builder()
                    .base_url("http://127.0.0.1:9")
                    .file_store(&path)
                    .build()
                    .unwrap(),
            );

            let a = tokio::spawn({
                let client = client.clone();
                async move { client.get_user_id().await }
            });
            let b = tokio::spawn({
                let client = client.clone();
                async move { client.get_user_id().await }
            });
            let (c, d) = tokio::join!(client.get_user_id(), client.get_user_id());
            let (a, b) = (a.await.unwrap(), b.await.unwrap());

            let stored = FileStore::new(&path).get(USER_ID_KEY).await.unwrap();
            assert_eq!(stored.as_deref(), Some(a.as_str()));
            assert_eq!(a, b);
            assert_eq!(a, c);
            assert_eq!(a, d);
        }
    }
}
