//! JSON-over-HTTP transport used by [`crate::ChatClient`].

mod http;

pub use http::{HttpTransport, TransportError};
