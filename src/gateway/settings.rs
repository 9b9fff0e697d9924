//! Service-facing settings derived from the resolved configuration.
//!
//! The resolver only merges values; everything the HTTP side needs is
//! checked and normalized here, at construction time.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use url::Url;

use crate::config::defaults::{DEFAULT_ADDR, ORIGIN_SEPARATOR, SAME_ORIGIN};
use crate::config::Config;
use crate::gateway::GatewayError;

/// Resource method used to authenticate from HTTP headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAuth {
    pub rid: String,
    pub method: String,
}

/// CORS policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowOrigin {
    /// Any origin is allowed.
    Any,
    /// Only the origin the request was sent to (`sop`).
    SameOrigin,
    /// Only the listed origins, in `scheme://host[:port]` form.
    List(Vec<String>),
}

impl AllowOrigin {
    /// Whether a request carrying `origin`, addressed to `host`, may be
    /// served.
    pub fn allows(&self, origin: &str, host: Option<&str>) -> bool {
        match self {
            AllowOrigin::Any => true,
            AllowOrigin::SameOrigin => host.is_some_and(|host| same_authority(origin, host)),
            AllowOrigin::List(origins) => origins.iter().any(|o| o.eq_ignore_ascii_case(origin)),
        }
    }
}

/// Whether the `host[:port]` part of `origin` is `host`.
fn same_authority(origin: &str, host: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(origin_host) = url.host_str() else {
        return false;
    };
    match url.port() {
        Some(port) => format!("{origin_host}:{port}").eq_ignore_ascii_case(host),
        None => origin_host.eq_ignore_ascii_case(host),
    }
}

/// Encoding used for web resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEncoding {
    Json,
    JsonFlat,
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Validated settings for the HTTP side of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub ws_path: String,
    pub api_path: String,
    pub header_auth: Option<HeaderAuth>,
    pub allow_origin: AllowOrigin,
    pub api_encoding: ApiEncoding,
    pub tls: Option<TlsFiles>,
}

impl ServerSettings {
    /// Check and normalize the service-facing part of `config`.
    pub fn prepare(config: &Config) -> Result<Self, GatewayError> {
        let addr = config.addr.as_deref().unwrap_or(DEFAULT_ADDR);
        let ip: IpAddr = addr
            .parse()
            .map_err(|_| invalid("addr", addr, "not a valid IP address"))?;

        let header_auth = config
            .header_auth
            .as_deref()
            .map(parse_header_auth)
            .transpose()?;

        let allow_origin = match config.allow_origin.as_deref() {
            Some(value) => parse_allow_origin(value)?,
            None => AllowOrigin::Any,
        };

        let api_encoding = match config.api_encoding.to_ascii_lowercase().as_str() {
            "json" => ApiEncoding::Json,
            "jsonflat" => ApiEncoding::JsonFlat,
            _ => {
                return Err(invalid(
                    "apiEncoding",
                    &config.api_encoding,
                    "must be json or jsonflat",
                ))
            }
        };

        let tls = if config.tls {
            if config.tls_cert.is_empty() {
                return Err(GatewayError::MissingSetting("certificate file not set"));
            }
            if config.tls_key.is_empty() {
                return Err(GatewayError::MissingSetting("private key file not set"));
            }
            Some(TlsFiles {
                cert: PathBuf::from(&config.tls_cert),
                key: PathBuf::from(&config.tls_key),
            })
        } else {
            None
        };

        Ok(Self {
            bind: SocketAddr::new(ip, config.port),
            ws_path: leading_slash(&config.ws_path),
            api_path: trailing_slash(leading_slash(&config.api_path)),
            header_auth,
            allow_origin,
            api_encoding,
            tls,
        })
    }

    /// `http` or `https`.
    pub fn scheme(&self) -> &'static str {
        if self.tls.is_some() {
            "https"
        } else {
            "http"
        }
    }
}

fn parse_header_auth(value: &str) -> Result<HeaderAuth, GatewayError> {
    match value.rsplit_once('.') {
        Some((rid, method)) if !rid.is_empty() && !method.is_empty() && !method.contains('/') => {
            Ok(HeaderAuth {
                rid: rid.to_string(),
                method: method.to_string(),
            })
        }
        _ => Err(invalid("headerAuth", value, "must be a resource method (rid.method)")),
    }
}

fn parse_allow_origin(value: &str) -> Result<AllowOrigin, GatewayError> {
    let entries: Vec<&str> = value.split(ORIGIN_SEPARATOR).map(str::trim).collect();
    let policy = |entry: &str| match entry {
        "*" => Some(AllowOrigin::Any),
        e if e.eq_ignore_ascii_case(SAME_ORIGIN) => Some(AllowOrigin::SameOrigin),
        _ => None,
    };

    if let Some(fixed) = entries.iter().copied().find_map(policy) {
        if entries.len() > 1 {
            return Err(invalid(
                "allowOrigin",
                value,
                "'*' and 'sop' must not be combined with other origins",
            ));
        }
        return Ok(fixed);
    }

    entries
        .into_iter()
        .map(|entry| {
            normalize_origin(entry)
                .ok_or_else(|| invalid("allowOrigin", entry, "not a valid origin"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowOrigin::List)
}

/// `scheme://host[:port]`, or `None` if `entry` is not a bare origin.
fn normalize_origin(entry: &str) -> Option<String> {
    let url = Url::parse(entry).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return None;
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

fn leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn trailing_slash(path: String) -> String {
    if path.ends_with('/') {
        path
    } else {
        path + "/"
    }
}

fn invalid(setting: &'static str, value: &str, reason: &'static str) -> GatewayError {
    GatewayError::InvalidSetting {
        setting,
        value: value.to_string(),
        reason,
    }
}
