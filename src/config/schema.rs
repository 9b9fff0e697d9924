//! Configuration schema definitions.
//!
//! [`Config`] is the resolved configuration handed to the gateway. It is also
//! the shape written to newly created config files. [`ConfigLayer`] is the
//! partial view read back from such a file: a field the file leaves out (or
//! sets to `null`) does not override anything.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    DEFAULT_ADDR, DEFAULT_ALLOW_ORIGIN, DEFAULT_API_ENCODING, DEFAULT_API_PATH, DEFAULT_NATS_URL,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_WS_PATH,
};

/// Root configuration for the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Upstream messaging server URL.
    pub nats_url: String,

    /// Upstream user credentials file.
    pub nats_creds: Option<String>,

    /// Upstream request timeout in milliseconds.
    pub request_timeout: u64,

    /// Enable debug logging.
    pub debug: bool,

    /// Enable trace logging.
    pub trace: bool,

    /// Bind address for client connections.
    pub addr: Option<String>,

    /// HTTP port for client connections.
    pub port: u16,

    /// WebSocket path for clients.
    pub ws_path: String,

    /// Web resource path for clients.
    pub api_path: String,

    /// Resource method used for header authentication (`rid.method`).
    pub header_auth: Option<String>,

    /// Allowed CORS origins, separated by `;`.
    pub allow_origin: Option<String>,

    /// Encoding for web resources: `json` or `jsonflat`.
    pub api_encoding: String,

    /// Serve HTTPS instead of HTTP.
    pub tls: bool,

    /// Certificate file (PEM) used when `tls` is on.
    pub tls_cert: String,

    /// Private key file (PEM) used when `tls` is on.
    pub tls_key: String,
}

impl Config {
    /// A configuration with every field unset.
    ///
    /// Resolution starts from a value like this (or a partially filled one)
    /// and fills the gaps with [`Config::set_default`].
    pub fn unset() -> Self {
        Self {
            nats_url: String::new(),
            nats_creds: None,
            request_timeout: 0,
            debug: false,
            trace: false,
            addr: None,
            port: 0,
            ws_path: String::new(),
            api_path: String::new(),
            header_auth: None,
            allow_origin: None,
            api_encoding: String::new(),
            tls: false,
            tls_cert: String::new(),
            tls_key: String::new(),
        }
    }

    /// Fill every unset required field with its compiled-in default.
    pub fn set_default(&mut self) {
        if self.nats_url.is_empty() {
            self.nats_url = DEFAULT_NATS_URL.to_string();
        }
        if self.request_timeout == 0 {
            self.request_timeout = DEFAULT_REQUEST_TIMEOUT;
        }
        if self.addr.is_none() {
            self.addr = Some(DEFAULT_ADDR.to_string());
        }
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.ws_path.is_empty() {
            self.ws_path = DEFAULT_WS_PATH.to_string();
        }
        if self.api_path.is_empty() {
            self.api_path = DEFAULT_API_PATH.to_string();
        }
        if self.api_encoding.is_empty() {
            self.api_encoding = DEFAULT_API_ENCODING.to_string();
        }
        if self.allow_origin.is_none() {
            self.allow_origin = Some(DEFAULT_ALLOW_ORIGIN.to_string());
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self::unset();
        config.set_default();
        config
    }
}

/// Settings read from a config file. Only the fields present override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigLayer {
    pub nats_url: Option<String>,
    pub nats_creds: Option<String>,
    pub request_timeout: Option<u64>,
    pub debug: Option<bool>,
    pub trace: Option<bool>,
    pub addr: Option<String>,
    pub port: Option<u16>,
    pub ws_path: Option<String>,
    pub api_path: Option<String>,
    pub header_auth: Option<String>,
    pub allow_origin: Option<String>,
    pub api_encoding: Option<String>,
    pub tls: Option<bool>,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

impl ConfigLayer {
    /// Override `config` with every field this layer specifies.
    pub fn apply_to(self, config: &mut Config) {
        if let Some(v) = self.nats_url {
            config.nats_url = v;
        }
        if let Some(v) = self.nats_creds {
            config.nats_creds = optional(v);
        }
        if let Some(v) = self.request_timeout {
            config.request_timeout = v;
        }
        if let Some(v) = self.debug {
            config.debug = v;
        }
        if let Some(v) = self.trace {
            config.trace = v;
        }
        if let Some(v) = self.addr {
            config.addr = optional(v);
        }
        if let Some(v) = self.port {
            config.port = v;
        }
        if let Some(v) = self.ws_path {
            config.ws_path = v;
        }
        if let Some(v) = self.api_path {
            config.api_path = v;
        }
        if let Some(v) = self.header_auth {
            config.header_auth = optional(v);
        }
        if let Some(v) = self.allow_origin {
            config.allow_origin = optional(v);
        }
        if let Some(v) = self.api_encoding {
            config.api_encoding = v;
        }
        if let Some(v) = self.tls {
            config.tls = v;
        }
        if let Some(v) = self.tls_cert {
            config.tls_cert = v;
        }
        if let Some(v) = self.tls_key {
            config.tls_key = v;
        }
    }
}

/// An empty value clears an optional field.
pub(crate) fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
