//! Connection lifecycle: `Open → Closing → Closed`
//!
//! Shared between the hub (which moves a connection to `Closing` when it
//! leaves the active set) and the connection's two tasks (which close the
//! socket and report their exit). `Closed` is reached once the socket is
//! closed and both tasks have finished.

use std::sync::Arc;

use tokio::sync::watch;

/// Tasks each connection runs: reader and writer
const CONNECTION_TASKS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, both tasks running
    Open,
    /// Left the active set or hit a fatal I/O error; tasks may still be draining
    Closing,
    /// Socket closed and both tasks exited
    Closed,
}

#[derive(Clone, Copy, Debug)]
struct Status {
    state: ConnectionState,
    socket_closed: bool,
    running_tasks: usize,
}

impl Status {
    /// Promote to `Closed` when nothing is left running
    fn settle(&mut self) {
        if self.socket_closed && self.running_tasks == 0 {
            self.state = ConnectionState::Closed;
        }
    }
}

/// Cloneable handle onto one connection's state
///
/// All transitions go through one `watch` channel, so they are applied one
/// at a time and every waiter sees them.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    status: Arc<watch::Sender<Status>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (status, _) = watch::channel(Status {
            state: ConnectionState::Open,
            socket_closed: false,
            running_tasks: CONNECTION_TASKS,
        });
        Self {
            status: Arc::new(status),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    pub fn is_socket_closed(&self) -> bool {
        self.status.borrow().socket_closed
    }

    /// `Open → Closing`. Returns `true` only for the call that made the move.
    pub fn begin_closing(&self) -> bool {
        self.status.send_if_modified(|status| {
            if status.state == ConnectionState::Open {
                status.state = ConnectionState::Closing;
                true
            } else {
                false
            }
        })
    }

    /// Mark the socket closed. Idempotent; returns `true` only the first time.
    pub fn close_socket(&self) -> bool {
        self.status.send_if_modified(|status| {
            if status.socket_closed {
                return false;
            }
            status.socket_closed = true;
            if status.state == ConnectionState::Open {
                status.state = ConnectionState::Closing;
            }
            status.settle();
            true
        })
    }

    /// Report that one of the connection's tasks has exited
    pub fn task_finished(&self) {
        self.status.send_if_modified(|status| {
            if status.running_tasks == 0 {
                return false;
            }
            status.running_tasks -= 1;
            status.settle();
            true
        });
    }

    /// Resolves once the socket has been closed by either side
    pub async fn socket_closed(&self) {
        let mut rx = self.status.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|status| status.socket_closed).await;
    }

    /// Resolves once the connection is fully `Closed`
    pub async fn closed(&self) {
        let mut rx = self.status.subscribe();
        let _ = rx
            .wait_for(|status| status.state == ConnectionState::Closed)
            .await;
    }
}
