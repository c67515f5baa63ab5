//! Connection hub
//!
//! The single authority over which connections are listening. Callers talk to
//! it through a [`HubHandle`]; the [`Hub`] itself runs as one task that owns
//! the active set and fans broadcasts out to each connection's bounded
//! outbound queue.
//!
//! A connection whose queue is full when a broadcast arrives is dropped from
//! the set instead of making the broadcast wait for it.

mod command;
mod control;
pub mod queue;

pub use command::Registration;
pub use control::{Hub, HubHandle, HubStats};
pub use queue::{outbound_queue, OutboundReceiver, OutboundSender, Rejected};
