//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum router, trace layer)
//!     → cors.rs (origin check, CORS headers)
//!     → server.rs dispatch
//!         path == wsPath        → websocket.rs
//!         path under apiPath    → response.rs (resource engine unavailable)
//!         anything else         → 404
//! ```

pub mod cors;
pub mod response;
pub mod server;
pub mod websocket;

pub use server::build_router;
