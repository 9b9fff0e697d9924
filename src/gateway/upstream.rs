//! Upstream messaging client settings.
//!
//! The request/reply transport lives outside this crate. The gateway only
//! checks that what it would hand to it is usable.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::config::Config;
use crate::gateway::GatewayError;

/// Schemes accepted for the upstream server URL.
const SCHEMES: [&str; 4] = ["nats", "tls", "ws", "wss"];

/// Connection settings for the upstream messaging server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub url: Url,
    pub creds: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl UpstreamSettings {
    /// Check the upstream part of `config`.
    pub fn prepare(config: &Config) -> Result<Self, GatewayError> {
        let url = Url::parse(&config.nats_url).map_err(|e| GatewayError::Upstream {
            url: config.nats_url.clone(),
            reason: e.to_string(),
        })?;
        if !SCHEMES.contains(&url.scheme()) {
            return Err(GatewayError::Upstream {
                url: config.nats_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        let creds = config.nats_creds.as_ref().map(PathBuf::from);
        if let Some(path) = &creds {
            if !path.is_file() {
                return Err(GatewayError::Credentials(path.clone()));
            }
        }

        Ok(Self {
            url,
            creds,
            request_timeout: Duration::from_millis(config.request_timeout),
        })
    }
}
