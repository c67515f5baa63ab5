//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    response::Response,
};
use serde::Deserialize;

use super::state::AppState;
use crate::connection::Connection;
use crate::types::PeerId;

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    /// Caller identity, taken verbatim
    #[serde(default)]
    pub user_id: String,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let peer = PeerId::new(params.user_id);
    let hub = state.hub.clone();
    let config = Arc::clone(&state.hub_config);
    let failed_peer = peer.clone();

    ws.max_message_size(config.max_frame_size)
        .max_frame_size(config.max_frame_size)
        .on_failed_upgrade(move |error: axum::Error| {
            tracing::warn!(peer = %failed_peer, %error, "websocket upgrade failed");
        })
        .on_upgrade(move |socket| async move {
            let connection = Connection::accept(socket, peer, hub, config).await;
            connection.join().await;
        })
}
