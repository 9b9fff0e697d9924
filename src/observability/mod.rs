//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields)
//!     → logging.rs (level filter, stderr formatter)
//! ```
//!
//! # Design Decisions
//! - Logging starts at info before the configuration is known, so resolver
//!   warnings are visible
//! - The level is switched once debug/trace settings are resolved
//! - Logs go to stderr; stdout is reserved for usage and version output

pub mod logging;
