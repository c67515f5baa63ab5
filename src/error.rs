//! Error types
//!
//! Each concern gets its own enum. Transport errors never leave the
//! connection they belong to; they are only logged as the reason a read or
//! write path ended.

use std::time::Duration;

/// Result type for service-level operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors that stop the HTTP service
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Errors returned by hub queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    #[error("hub control loop has stopped")]
    Stopped,
}

/// Why a connection's read or write path ended
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("no pong received within {0:?}")]
    ReadDeadline(Duration),

    #[error("write did not complete within {0:?}")]
    WriteDeadline(Duration),

    #[error("frame of {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("socket error: {0}")]
    Socket(String),

    #[error("peer closed the connection")]
    PeerClosed,

    #[error("socket closed locally")]
    LocalClose,
}
