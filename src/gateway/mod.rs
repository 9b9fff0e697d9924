//! Gateway service shell.
//!
//! # Data Flow
//! ```text
//! Config
//!     → settings.rs (bind address, paths, CORS, header auth, encoding, TLS files)
//!     → upstream.rs (upstream URL, credentials, request timeout)
//!     → service.rs
//!         new():   load TLS material
//!         start(): bind listener, serve router, hand back stop notice
//!         stop():  graceful shutdown of the HTTP server
//! ```
//!
//! # Design Decisions
//! - Everything that can be checked without network I/O is checked at
//!   construction
//! - The resource protocol engine is not part of this crate; resource
//!   requests are answered as unavailable

pub mod service;
pub mod settings;
pub mod upstream;

use std::path::PathBuf;

use thiserror::Error;

use crate::net::listener::ListenerError;

pub use service::GatewayService;
pub use settings::ServerSettings;
pub use upstream::UpstreamSettings;

/// Errors raised by the gateway service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A setting has a value the gateway cannot use.
    #[error("invalid {setting} setting ({value}): {reason}")]
    InvalidSetting {
        setting: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A setting required by another one is empty.
    #[error("{0}")]
    MissingSetting(&'static str),

    /// Certificate or key could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    /// The upstream server URL is unusable.
    #[error("invalid NATS URL ({url}): {reason}")]
    Upstream { url: String, reason: String },

    /// The upstream credentials file does not exist.
    #[error("NATS credentials file not found: {}", .0.display())]
    Credentials(PathBuf),

    /// The client listener could not be opened.
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// The HTTP server failed while running.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}
