//! resgate gateway server library.
//!
//! Configuration resolution, process lifecycle and the HTTP service shell
//! of the gateway binary.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::Config;
pub use gateway::GatewayService;
pub use lifecycle::Lifecycle;
