//! # refetch-api
//!
//! HTTP surface for the refetch scheduler:
//! - **http**: router, schedule management handlers, monitoring endpoints
//! - **server**: the axum server and its configuration
//! - **state**: application state shared across handlers
//!
//! Validation errors surface synchronously as 400 responses; firing-time
//! errors never reach a request — the scheduler logs and swallows them.

pub mod http;
pub mod server;
pub mod state;

pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
