//! Compiled-in defaults.
//!
//! Every value the resolver falls back to lives here, so the binary, the
//! usage text and the generated config files agree on them.

use std::time::Duration;

/// How long the coordinator waits for the service to stop before aborting.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upstream messaging server.
pub const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";

/// Default timeout for upstream requests, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 3000;

/// Request timeouts at or below this value are read as seconds.
pub const LEGACY_TIMEOUT_THRESHOLD: u64 = 10;

/// Default bind address for client connections.
pub const DEFAULT_ADDR: &str = "0.0.0.0";

/// Default HTTP port for client connections.
pub const DEFAULT_PORT: u16 = 8080;

/// Default WebSocket path.
pub const DEFAULT_WS_PATH: &str = "/";

/// Default web resource path.
pub const DEFAULT_API_PATH: &str = "/api/";

/// Default encoding for web resources.
pub const DEFAULT_API_ENCODING: &str = "json";

/// Default CORS policy: any origin.
pub const DEFAULT_ALLOW_ORIGIN: &str = "*";

/// Separator used when several allowed origins are flattened into one value.
pub const ORIGIN_SEPARATOR: &str = ";";

/// `allowOrigin` value restricting CORS to the same origin as the request.
pub const SAME_ORIGIN: &str = "sop";

/// Gateway version reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client protocol version reported by `--version`.
pub const PROTOCOL_VERSION: &str = "1.2.3";

/// Where operators find the configuration reference.
pub const CONFIG_DOCS_URL: &str = "https://resgate.io/docs/get-started/configuration/";

/// How long open connections get to finish once the server stops accepting.
/// Kept below [`STOP_TIMEOUT`].
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
