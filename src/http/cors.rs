//! CORS middleware.
//!
//! Requests without an `Origin` header pass untouched. Allowed origins are
//! echoed back; any other origin is refused with 403. Under a list policy
//! the refusal names the first allowed origin.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::gateway::settings::AllowOrigin;
use crate::http::response;

pub async fn cors_middleware(
    State(policy): State<Arc<AllowOrigin>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req.headers().get(header::ORIGIN).cloned();

    let Some(origin) = origin else {
        let mut res = next.run(req).await;
        apply(&policy, None, res.headers_mut());
        return res;
    };

    let allowed = {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|host| host.to_str().ok())
            .or_else(|| req.uri().authority().map(|authority| authority.as_str()));
        origin
            .to_str()
            .map(|value| policy.allows(value, host))
            .unwrap_or(false)
    };
    if !allowed {
        tracing::debug!(origin = ?origin, "Origin not allowed");
        let mut res = response::forbidden_origin();
        apply(&policy, None, res.headers_mut());
        return res;
    }

    let mut res = next.run(req).await;
    apply(&policy, Some(origin), res.headers_mut());
    res
}

fn apply(policy: &AllowOrigin, origin: Option<HeaderValue>, headers: &mut HeaderMap) {
    match policy {
        AllowOrigin::Any => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
        AllowOrigin::SameOrigin => {
            if let Some(origin) = origin {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
        AllowOrigin::List(origins) => {
            let value = origin.or_else(|| {
                origins
                    .first()
                    .and_then(|first| HeaderValue::from_str(first).ok())
            });
            if let Some(value) = value {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}
