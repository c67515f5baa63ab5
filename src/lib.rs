//! PS Hub
//!
//! Real-time broadcast hub for the panic-support backend: every message a
//! WebSocket client sends is fanned out to every connected client.
//!
//! # Features
//!
//! - **Single control loop**: registration, deregistration and broadcast are
//!   messages to one task that owns the set of active connections
//! - **Bounded fan-out**: each connection has its own 256-slot outbound
//!   queue; a client that falls behind is dropped instead of stalling others
//! - **Liveness**: 54s keepalive pings, 60s pong-refreshed read deadline,
//!   10s write deadline
//! - **Idempotent teardown**: a connection is unregistered and closed at most
//!   once, whichever side notices the failure first
//!
//! # Modules
//!
//! - `hub`: control loop, handle and outbound queues
//! - `connection`: per-socket read and write tasks and their lifecycle
//! - `api`: Axum router, WebSocket upgrade and REST endpoints
//! - `server`: listener binding and shutdown
//! - `config`: hub constants and environment configuration
//! - `error`: error types
//! - `telemetry`: tracing setup
//! - `types`: payloads and identifiers
//!
//! # Example
//!
//! ```no_run
//! use ps_hub::config::{HubConfig, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> ps_hub::error::Result<()> {
//!     let handle = ps_hub::server::start(&ServerConfig::default(), HubConfig::default()).await?;
//!     handle.hub().broadcast("server says hi").await;
//!     handle.shutdown().await
//! }
//! ```

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod hub;
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{HubConfig, ServerConfig};
pub use connection::{Connection, ConnectionState, Lifecycle};
pub use error::{HubError, ServerError, TransportError};
pub use hub::{Hub, HubHandle, HubStats, Registration};
pub use types::{ConnectionKey, Payload, PeerId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
