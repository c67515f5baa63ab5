//! Opaque application payloads carried by the hub

use std::sync::Arc;

use axum::extract::ws::Message;

/// One application message, forwarded without interpretation
///
/// The buffer is shared, so cloning a payload once per recipient during
/// fan-out does not copy the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Text(Arc<str>),
    Binary(Arc<[u8]>),
}

impl Payload {
    /// Size of the payload in bytes
    pub fn len(&self) -> usize {
        match self {
            Payload::Text(text) => text.len(),
            Payload::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract the payload from an application frame
    ///
    /// Control frames (ping, pong, close) carry no payload and yield `None`.
    pub fn from_message(msg: Message) -> Option<Self> {
        match msg {
            Message::Text(text) => Some(Payload::Text(text.into())),
            Message::Binary(bytes) => Some(Payload::Binary(bytes.into())),
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
        }
    }

    /// Build the outbound frame for this payload
    pub fn to_message(&self) -> Message {
        match self {
            Payload::Text(text) => Message::Text(text.to_string()),
            Payload::Binary(bytes) => Message::Binary(bytes.to_vec()),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.into())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text.into())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes.into())
    }
}
