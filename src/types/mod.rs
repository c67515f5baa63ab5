//! Data types shared by the hub and its connections

mod ids;
mod payload;

pub use ids::{ConnectionKey, PeerId};
pub use payload::Payload;
