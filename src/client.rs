//! Client for the Afira inference server.
//!
//! Keep the public surface small: [`ChatClient`] for the operations,
//! [`ChatClientBuilder`] for configuration.

pub mod builder;
pub mod core;
pub mod user_id;

pub use builder::{ChatClientBuilder, DEFAULT_BASE_URL};
pub use core::{ChatClient, APOLOGY_REPLY, GREETING, NOT_READY_REPLY};
pub use user_id::generate_user_id;
