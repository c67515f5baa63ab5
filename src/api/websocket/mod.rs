//! WebSocket upgrade boundary
//!
//! `GET /ws?user_id=<id>` upgrades the request and hands the socket to the
//! hub as a new connection. All clients share one broadcast channel.

pub mod handler;
pub mod state;
