//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv
//!     → args.rs (clap command built from options.rs, explicit overrides only)
//!     → resolver.rs
//!         base Config
//!         → store.rs (config file layer, if --config was given)
//!         → command-line layer
//!         → defaults.rs (anything still unset)
//!         → store.rs (create the config file if it did not exist)
//!     → Config (resolved, immutable)
//! ```
//!
//! # Design Decisions
//! - Precedence is strictly defaults < file < explicit command line
//! - Only options present on the command line override; an explicit empty
//!   value clears optional fields
//! - Every failure here is fatal; the gateway never starts half-configured

pub mod args;
pub mod defaults;
pub mod options;
pub mod resolver;
pub mod schema;
pub mod store;

pub use args::{CommandLine, Invocation};
pub use resolver::resolve;
pub use schema::{Config, ConfigLayer};
pub use store::{ConfigError, ConfigStore, FileStore};
