//! API module for HTTP and WebSocket endpoints
//!
//! The WebSocket endpoint feeds the connection hub; the REST endpoints expose
//! health and hub statistics.

pub mod http;
pub mod rest;
pub mod websocket;
