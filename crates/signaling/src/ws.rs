//! WebSocket-Endpunkt – Akzeptiert Verbindungen
//!
//! Jede akzeptierte Verbindung erhaelt eine frische `VerbindungsId` und
//! einen eigenen tokio-Task mit einer `ClientConnection`. Ein Client der
//! sich neu verbindet bekommt eine neue ID und muss `login`/`join_room`
//! erneut senden.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use std::sync::Arc;
use videoruf_core::VerbindungsId;

use crate::connection::ClientConnection;
use crate::server_state::SignalingState;

/// Axum-Handler fuer `GET /ws`: Upgrade auf WebSocket
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<SignalingState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        let verbindung = VerbindungsId::new();
        ClientConnection::neu(state, verbindung).verarbeiten(socket)
    })
}
