//! # Storage Module
//!
//! Persistent key/value slot behind the user identifier. The client only
//! ever touches one key ([`USER_ID_KEY`]); backends are pluggable.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`KeyValueStore`] | Trait for implementing custom backends |
//! | [`MemoryStore`] | In-process map, lost on exit |
//! | [`FileStore`] | JSON object file on disk |
//! | [`KeyringStore`] | OS credential store |
//!
//! ## Example
//!
//! ```rust
//! use afira_client::storage::{FileStore, KeyValueStore};
//!
//! # async fn demo() -> afira_client::Result<()> {
//! let store = FileStore::new(".afira_state.json");
//! store.set("afira_user_id", "user_k3j2h4g5f6d7s8").await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod credential;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use credential::KeyringStore;

/// Storage key of the persisted user identifier.
pub const USER_ID_KEY: &str = "afira_user_id";
