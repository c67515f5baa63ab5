//! Hub control loop
//!
//! One task owns the active set. Every mutation arrives as a [`HubCommand`]
//! and is applied in arrival order, so the set needs no lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::command::{HubCommand, Registration};
use super::queue::Rejected;
use crate::error::HubError;
use crate::types::{ConnectionKey, Payload};

/// Commands buffered between callers and the control loop
const COMMAND_BUFFER: usize = 1024;

/// Point-in-time view of the hub, answered by the control loop itself
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub active_connections: usize,
    pub total_registrations: u64,
    pub total_unregistrations: u64,
    pub total_broadcasts: u64,
    pub total_evictions: u64,
    pub started_at: DateTime<Utc>,
}

/// Cloneable handle for talking to the hub
///
/// The control loop runs until every handle has been dropped.
#[derive(Clone, Debug)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Add a connection to the active set
    pub async fn register(&self, registration: Registration) {
        self.submit(HubCommand::Register(registration)).await;
    }

    /// Remove a connection and close its queue; no-op if it is not present
    pub async fn unregister(&self, key: ConnectionKey) {
        self.submit(HubCommand::Unregister(key)).await;
    }

    /// Fan a payload out to every registered connection
    pub async fn broadcast(&self, payload: impl Into<Payload>) {
        self.submit(HubCommand::Broadcast(payload.into())).await;
    }

    /// Snapshot of the active set and counters
    ///
    /// Also works as a barrier: every command sent before it has been applied
    /// by the time it returns.
    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(HubCommand::Stats(reply_tx))
            .await
            .map_err(|_| HubError::Stopped)?;
        reply_rx.await.map_err(|_| HubError::Stopped)
    }

    async fn submit(&self, command: HubCommand) {
        if let Err(mpsc::error::SendError(command)) = self.tx.send(command).await {
            tracing::debug!(?command, "hub stopped, dropping command");
        }
    }
}

/// The active set plus its intake
pub struct Hub {
    active: HashMap<ConnectionKey, Registration>,
    commands: mpsc::Receiver<HubCommand>,
    total_registrations: u64,
    total_unregistrations: u64,
    total_broadcasts: u64,
    total_evictions: u64,
    started_at: DateTime<Utc>,
}

impl Hub {
    /// Create a hub and the handle that feeds it, without starting the loop
    pub fn with_handle() -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let hub = Self {
            active: HashMap::new(),
            commands: rx,
            total_registrations: 0,
            total_unregistrations: 0,
            total_broadcasts: 0,
            total_evictions: 0,
            started_at: Utc::now(),
        };
        (hub, HubHandle { tx })
    }

    /// Start the control loop on the current runtime
    pub fn spawn() -> HubHandle {
        let (hub, handle) = Self::with_handle();
        tokio::spawn(hub.run());
        handle
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!("hub control loop started");

        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }

        let remaining = self.active.len();
        for (_, registration) in self.active.drain() {
            registration.lifecycle.begin_closing();
        }
        tracing::info!(remaining, "hub control loop stopped");
    }

    fn apply(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(registration) => self.register(registration),
            HubCommand::Unregister(key) => self.unregister(key),
            HubCommand::Broadcast(payload) => self.broadcast(payload),
            HubCommand::Stats(reply) => {
                // Caller may have given up waiting
                let _ = reply.send(self.stats());
            }
        }
    }

    fn register(&mut self, registration: Registration) {
        let key = registration.key;
        let peer = registration.peer.clone();

        if self.active.insert(key, registration).is_some() {
            tracing::debug!(%key, %peer, "connection registered twice, keeping latest");
        } else {
            self.total_registrations += 1;
        }

        tracing::info!(%key, %peer, active = self.active.len(), "client registered");
    }

    fn unregister(&mut self, key: ConnectionKey) {
        // Dropping the registration drops the queue's only sender
        if let Some(registration) = self.active.remove(&key) {
            registration.lifecycle.begin_closing();
            self.total_unregistrations += 1;
            tracing::info!(
                %key,
                peer = %registration.peer,
                active = self.active.len(),
                "client unregistered"
            );
        }
    }

    fn broadcast(&mut self, payload: Payload) {
        self.total_broadcasts += 1;
        let mut evicted = 0u64;

        self.active.retain(|key, registration| {
            match registration.outbound.offer(payload.clone()) {
                Ok(()) => true,
                Err(reason) => {
                    registration.lifecycle.begin_closing();
                    evicted += 1;
                    match reason {
                        Rejected::Full => tracing::warn!(
                            %key,
                            peer = %registration.peer,
                            "outbound queue full, dropping client"
                        ),
                        Rejected::Closed => tracing::debug!(
                            %key,
                            peer = %registration.peer,
                            "outbound queue closed, dropping client"
                        ),
                    }
                    false
                }
            }
        });

        self.total_evictions += evicted;
        tracing::trace!(
            bytes = payload.len(),
            recipients = self.active.len(),
            evicted,
            "broadcast"
        );
    }

    fn stats(&self) -> HubStats {
        HubStats {
            active_connections: self.active.len(),
            total_registrations: self.total_registrations,
            total_unregistrations: self.total_unregistrations,
            total_broadcasts: self.total_broadcasts,
            total_evictions: self.total_evictions,
            started_at: self.started_at,
        }
    }
}
