//! HTTP router setup.
//!
//! # Responsibilities
//! - Dispatch requests to the WebSocket or web resource endpoint by path
//! - Wire up middleware (tracing, CORS)
//!
//! Dispatch is done by a single fallback handler rather than individual
//! routes, so any combination of configured paths is accepted.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        State,
    },
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::gateway::settings::ServerSettings;
use crate::http::cors::cors_middleware;
use crate::http::{response, websocket};

/// Paths the dispatcher routes on.
#[derive(Debug, Clone)]
struct Paths {
    ws: String,
    api: String,
}

/// Build the Axum router for the given settings.
pub fn build_router(settings: &ServerSettings) -> Router {
    let paths = Arc::new(Paths {
        ws: settings.ws_path.clone(),
        api: settings.api_path.clone(),
    });
    let policy = Arc::new(settings.allow_origin.clone());

    Router::new().fallback(dispatch).with_state(paths).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(policy, cors_middleware)),
    )
}

async fn dispatch(
    State(paths): State<Arc<Paths>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    uri: Uri,
) -> Response {
    let path = uri.path();

    if path == paths.ws {
        return match ws {
            Ok(ws) => websocket::upgrade(ws),
            Err(rejection) => rejection.into_response(),
        };
    }

    if let Some(resource) = path.strip_prefix(paths.api.as_str()) {
        let rid = resource.trim_end_matches('/').replace('/', ".");
        if rid.is_empty() {
            return response::not_found();
        }
        tracing::debug!(rid = %rid, "Web resource requested");
        return response::unavailable(&rid);
    }

    response::not_found()
}
