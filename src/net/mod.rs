//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerSettings.bind
//!     → listener.rs (bind, non-blocking std listener)
//!     → tls.rs (optional rustls acceptor config)
//!     → axum-server (accept loop, HTTP/1.1 and HTTP/2)
//! ```
//!
//! # Design Decisions
//! - Binding happens at service start so bind errors are start errors
//! - TLS material is loaded at construction so bad files fail early

pub mod listener;
pub mod tls;
