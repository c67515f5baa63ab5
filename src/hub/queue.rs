//! Bounded per-connection outbound queue
//!
//! The hub holds the only [`OutboundSender`] of each queue; the connection's
//! write task holds the [`OutboundReceiver`]. Dropping the sender is what
//! closes the queue, so it can only ever be closed once.

use tokio::sync::mpsc;

pub use tokio::sync::mpsc::error::TryRecvError;

use crate::types::Payload;

/// Why a payload could not be queued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// The queue is at capacity; the consumer is not keeping up
    Full,
    /// The receiving write task has gone away
    Closed,
}

/// Create a queue holding at most `capacity` pending payloads
pub fn outbound_queue(capacity: usize) -> (OutboundSender, OutboundReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (OutboundSender { tx }, OutboundReceiver { rx })
}

/// Producer side, owned by the hub
#[derive(Debug)]
pub struct OutboundSender {
    tx: mpsc::Sender<Payload>,
}

impl OutboundSender {
    /// Enqueue without waiting
    pub fn offer(&self, payload: Payload) -> Result<(), Rejected> {
        self.tx.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => Rejected::Full,
            mpsc::error::TrySendError::Closed(_) => Rejected::Closed,
        })
    }

    /// Free slots left in the queue
    pub fn remaining(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer side, owned by the connection's write task
#[derive(Debug)]
pub struct OutboundReceiver {
    rx: mpsc::Receiver<Payload>,
}

impl OutboundReceiver {
    /// Next pending payload; `None` once the queue is closed and drained
    pub async fn recv(&mut self) -> Option<Payload> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Payload, TryRecvError> {
        self.rx.try_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_until_full() {
        let (tx, mut rx) = outbound_queue(2);
        assert_eq!(tx.offer(Payload::from("m1")), Ok(()));
        assert_eq!(tx.offer(Payload::from("m2")), Ok(()));
        assert_eq!(tx.remaining(), 0);
        assert_eq!(tx.offer(Payload::from("m3")), Err(Rejected::Full));

        assert_eq!(rx.try_recv().unwrap(), Payload::from("m1"));
        assert_eq!(rx.try_recv().unwrap(), Payload::from("m2"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_drop_sender_drains_then_closes() {
        let (tx, mut rx) = outbound_queue(4);
        tx.offer(Payload::from("last")).unwrap();
        drop(tx);

        assert_eq!(rx.recv().await, Some(Payload::from("last")));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_offer_after_receiver_gone() {
        let (tx, rx) = outbound_queue(4);
        drop(rx);
        assert_eq!(tx.offer(Payload::from("late")), Err(Rejected::Closed));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (tx, _rx) = outbound_queue(0);
        assert_eq!(tx.offer(Payload::from("one")), Ok(()));
        assert_eq!(tx.offer(Payload::from("two")), Err(Rejected::Full));
    }
}
