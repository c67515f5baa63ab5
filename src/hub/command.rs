//! Requests accepted by the hub control loop

use tokio::sync::oneshot;

use super::control::HubStats;
use super::queue::{outbound_queue, OutboundReceiver, OutboundSender};
use crate::connection::Lifecycle;
use crate::types::{ConnectionKey, Payload, PeerId};

/// Everything the hub needs to know about one connection
#[derive(Debug)]
pub struct Registration {
    pub(crate) key: ConnectionKey,
    pub(crate) peer: PeerId,
    pub(crate) outbound: OutboundSender,
    pub(crate) lifecycle: Lifecycle,
}

impl Registration {
    pub fn new(
        key: ConnectionKey,
        peer: PeerId,
        outbound: OutboundSender,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            key,
            peer,
            outbound,
            lifecycle,
        }
    }

    /// Registration with a fresh key, queue and lifecycle, without a socket
    pub fn detached(peer: PeerId, capacity: usize) -> (Self, OutboundReceiver) {
        let (outbound, receiver) = outbound_queue(capacity);
        let registration = Self::new(ConnectionKey::next(), peer, outbound, Lifecycle::new());
        (registration, receiver)
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

#[derive(Debug)]
pub(crate) enum HubCommand {
    Register(Registration),
    Unregister(ConnectionKey),
    Broadcast(Payload),
    Stats(oneshot::Sender<HubStats>),
}
