//! WebSocket endpoint.
//!
//! Upgrades are accepted so clients get a proper close code instead of an
//! HTTP error. Without a resource engine there is nothing to subscribe to,
//! so every socket is closed with 1013 (try again later).

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

/// Complete the upgrade handshake.
pub fn upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(close_unavailable)
}

async fn close_unavailable(mut socket: WebSocket) {
    let frame = CloseFrame {
        code: close_code::AGAIN,
        reason: "resource engine unavailable".into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!(error = %e, "Failed to close WebSocket");
    }
}
