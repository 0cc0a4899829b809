//! # Types Module
//!
//! Wire types for the three inference server routes and the display-layer
//! [`Message`].
//!
//! | Route | Request | Response |
//! |-------|---------|----------|
//! | `GET /health` | none | [`HealthStatus`] |
//! | `POST /predict` | [`PredictRequest`] | [`PredictResponse`] |
//! | `POST /reset_session` | [`ResetRequest`] | [`ResetResponse`] |

pub mod message;
pub mod wire;

pub use message::{Message, Sender};
pub use wire::{
    HealthStatus, PredictRequest, PredictResponse, ResetRequest, ResetResponse,
};
