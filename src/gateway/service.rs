//! The gateway as a [`Service`] driven by the lifecycle coordinator.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::defaults::DRAIN_TIMEOUT;
use crate::config::Config;
use crate::gateway::settings::ServerSettings;
use crate::gateway::upstream::UpstreamSettings;
use crate::gateway::GatewayError;
use crate::http::build_router;
use crate::lifecycle::{Service, StopNotice};
use crate::net::{listener, tls};

type Serving = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

/// HTTP front of the gateway.
pub struct GatewayService {
    settings: ServerSettings,
    upstream: UpstreamSettings,
    tls: Option<RustlsConfig>,
    handle: Handle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl GatewayService {
    /// Build the service from a resolved configuration.
    ///
    /// Fails on any setting the gateway cannot use, including unreadable TLS
    /// material. Nothing is bound yet.
    pub async fn new(config: &Config) -> Result<Self, GatewayError> {
        let settings = ServerSettings::prepare(config)?;
        let upstream = UpstreamSettings::prepare(config)?;

        let tls = match &settings.tls {
            Some(files) => Some(
                tls::load_tls_config(&files.cert, &files.key)
                    .await
                    .map_err(GatewayError::Tls)?,
            ),
            None => None,
        };

        Ok(Self {
            settings,
            upstream,
            tls,
            handle: Handle::new(),
            task: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn upstream(&self) -> &UpstreamSettings {
        &self.upstream
    }

    /// Address the server listens on, once it has started.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.listening().await
    }
}

impl Service for GatewayService {
    type Error = GatewayError;

    async fn start(&self) -> Result<StopNotice<GatewayError>, GatewayError> {
        let listener = listener::bind(self.settings.bind)?;
        let app = build_router(&self.settings).into_make_service();

        let serving: Serving = match &self.tls {
            Some(config) => Box::pin(
                axum_server::from_tcp_rustls(listener, config.clone())
                    .handle(self.handle.clone())
                    .serve(app),
            ),
            None => Box::pin(
                axum_server::from_tcp(listener)
                    .handle(self.handle.clone())
                    .serve(app),
            ),
        };

        tracing::info!(
            scheme = self.settings.scheme(),
            bind = %self.settings.bind,
            ws_path = %self.settings.ws_path,
            api_path = %self.settings.api_path,
            api_encoding = ?self.settings.api_encoding,
            header_auth = ?self.settings.header_auth,
            nats_url = %self.upstream.url,
            request_timeout_ms = self.upstream.request_timeout.as_millis() as u64,
            "Gateway listening"
        );

        let (notify, notice) = oneshot::channel();
        let task = tokio::spawn(async move {
            let result = serving.await.map_err(GatewayError::Serve);
            if let Err(e) = &result {
                tracing::error!(error = %e, "HTTP server stopped unexpectedly");
            }
            let _ = notify.send(result);
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);

        Ok(notice)
    }

    async fn stop(&self, cause: Option<String>) {
        match &cause {
            Some(cause) => tracing::info!(cause = %cause, "Stopping gateway"),
            None => tracing::info!("Stopping gateway"),
        }

        self.handle.graceful_shutdown(Some(DRAIN_TIMEOUT));

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "HTTP server task failed");
            }
        }
        tracing::info!("Gateway stopped");
    }
}
