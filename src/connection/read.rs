//! Inbound half: socket frames become hub broadcasts

use std::fmt::Display;

use axum::extract::ws::Message;
use futures::{Stream, StreamExt};
use tokio::time::{timeout_at, Instant};

use super::lifecycle::Lifecycle;
use crate::config::HubConfig;
use crate::error::TransportError;
use crate::hub::HubHandle;
use crate::types::{ConnectionKey, Payload};

/// Read frames until the connection dies; returns why it stopped
///
/// Only pongs move the read deadline forward. Application frames are
/// forwarded to the hub untouched.
pub(crate) async fn read_frames<S, E>(
    stream: &mut S,
    key: ConnectionKey,
    hub: &HubHandle,
    lifecycle: &Lifecycle,
    config: &HubConfig,
) -> TransportError
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut deadline = Instant::now() + config.read_deadline;

    loop {
        let next = tokio::select! {
            _ = lifecycle.socket_closed() => return TransportError::LocalClose,
            next = timeout_at(deadline, stream.next()) => next,
        };

        let message = match next {
            Err(_) => return TransportError::ReadDeadline(config.read_deadline),
            Ok(None) => return TransportError::PeerClosed,
            Ok(Some(Err(e))) => return TransportError::Socket(e.to_string()),
            Ok(Some(Ok(message))) => message,
        };

        match message {
            Message::Pong(_) => {
                deadline = Instant::now() + config.read_deadline;
                tracing::trace!(%key, "pong");
            }
            // Answered by the websocket layer
            Message::Ping(_) => tracing::trace!(%key, "ping"),
            Message::Close(_) => return TransportError::PeerClosed,
            frame => {
                let Some(payload) = Payload::from_message(frame) else {
                    continue;
                };
                if payload.len() > config.max_frame_size {
                    return TransportError::FrameTooLarge {
                        size: payload.len(),
                        limit: config.max_frame_size,
                    };
                }
                tracing::trace!(%key, bytes = payload.len(), "inbound frame");
                hub.broadcast(payload).await;
            }
        }
    }
}
