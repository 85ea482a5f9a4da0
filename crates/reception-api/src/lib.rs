//! HTTP surface of the showroom assistant.
//!
//! Exposes chat turns, session management, quick services, transcript
//! intake, speech synthesis and the vehicle catalog over axum.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
