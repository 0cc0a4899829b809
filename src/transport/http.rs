use crate::{Error, ErrorContext, Result};
use reqwest::{Proxy, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// Single-request JSON transport bound to one base URL.
///
/// No retries, no backoff. A request is sent once and its outcome is
/// reported as-is.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        // No timeout unless one is configured; a hung server hangs the call.
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        if let Ok(proxy_url) = env::var("AFIRA_PROXY_URL") {
            match Proxy::all(&proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(%proxy_url, error = %e, "Ignoring invalid AFIRA_PROXY_URL"),
            }
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to create HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET {base}{path}` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TransportError::Http)?;
        Self::decode(response).await
    }

    /// `POST {base}{path}` with a JSON body and decode the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(TransportError::Http)?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(TransportError::Http)?;
        // Non-2xx bodies are never decoded, even when they hold valid JSON;
        // a `/health` answered with 503 counts as not ready.
        if !status.is_success() {
            return Err(TransportError::Status { status, body }.into());
        }
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e).into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response body: {0}")]
    Decode(serde_json::Error),
}

impl TransportError {
    /// HTTP status for non-success replies.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:5000/", None).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(transport.url("/health"), "http://localhost:5000/health");
    }

    #[test]
    fn invalid_proxy_is_ignored() {
        std::env::set_var("AFIRA_PROXY_URL", "::not a proxy::");
        let transport = HttpTransport::new("http://localhost:5000", None);
        std::env::remove_var("AFIRA_PROXY_URL");
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_not_decoded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ok","model_loaded":true}"#)
            .create_async()
            .await;
        let transport = HttpTransport::new(&server.url(), None).unwrap();

        let err = transport
            .get_json::<serde_json::Value>("/health")
            .await
            .unwrap_err();
        match err {
            Error::Transport(TransportError::Status { status, body }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert!(body.contains("model_loaded"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn status_error_reports_code() {
        let err = TransportError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "HTTP error! status: 500 Internal Server Error");
    }
}
