//! Outbound half: drain the queue to the socket, with keepalive pings

use std::fmt::Display;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt};
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

use super::lifecycle::Lifecycle;
use crate::config::HubConfig;
use crate::error::TransportError;
use crate::hub::OutboundReceiver;

/// Write until the queue is closed or a write fails
///
/// `Ok` means the queue was closed and drained and the close frame went out.
pub(crate) async fn write_frames<K>(
    sink: &mut K,
    queue: &mut OutboundReceiver,
    lifecycle: &Lifecycle,
    config: &HubConfig,
) -> Result<(), TransportError>
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    let period = config.keepalive_interval;
    let mut keepalive = interval_at(Instant::now() + period, period);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = lifecycle.socket_closed() => return Err(TransportError::LocalClose),
            next = queue.recv() => match next {
                Some(payload) => send_frame(sink, payload.to_message(), config.write_deadline).await?,
                None => return send_frame(sink, Message::Close(None), config.write_deadline).await,
            },
            _ = keepalive.tick() => {
                send_frame(sink, Message::Ping(Vec::new()), config.write_deadline).await?;
            }
        }
    }
}

/// Send one frame under the write deadline
async fn send_frame<K>(sink: &mut K, frame: Message, deadline: Duration) -> Result<(), TransportError>
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    match timeout(deadline, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(TransportError::Socket(e.to_string())),
        Err(_) => Err(TransportError::WriteDeadline(deadline)),
    }
}

/// Best-effort close of the sink half once writing is over
pub(crate) async fn close_sink<K>(sink: &mut K, deadline: Duration)
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    match timeout(deadline, sink.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::trace!(error = %e, "socket close failed"),
        Err(_) => tracing::trace!("socket close timed out"),
    }
}
