//! # afira-client
//!
//! Client adapter for the Afira chatbot inference server.
//!
//! ## Overview
//!
//! The server exposes three JSON routes (`/health`, `/predict`,
//! `/reset_session`). [`ChatClient`] wraps them with the behavior a chat
//! front-end needs:
//!
//! - **Readiness**: a cached flag set by the last health check
//! - **User identity**: a per-installation id, lazily generated and persisted
//!   through a pluggable [`storage::KeyValueStore`]
//! - **Graceful degradation**: only [`ChatClient::load_chat_data`] returns an
//!   error; every other operation falls back to a safe default and logs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use afira_client::ChatClient;
//!
//! #[tokio::main]
//! async fn main() -> afira_client::Result<()> {
//!     let client = ChatClient::builder()
//!         .base_url("http://localhost:5000")
//!         .file_store(".afira_state.json")
//!         .build()?;
//!
//!     client.load_chat_data().await?;
//!     println!("{}", client.get_greeting());
//!     println!("{}", client.process_user_message("hi").await);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client implementation and builder |
//! | [`storage`] | User id persistence backends |
//! | [`transport`] | JSON-over-HTTP transport |
//! | [`types`] | Wire types and the display-layer message |

pub mod client;
pub mod storage;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{ChatClient, ChatClientBuilder};
pub use types::{HealthStatus, Message, PredictResponse, Sender};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
