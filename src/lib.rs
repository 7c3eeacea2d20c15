//! coach-models: immutable wire records for the coaching app (chat,
//! coaching sessions, content library, subscription tiers, calls).
//!
//! The app's REST/WebSocket layers and the calling SDK produce and consume
//! these records; this crate only makes them and their JSON wire form
//! interconvertible.

pub mod codec;
pub mod domain;

pub use codec::{JsonCodec, JsonObject};
pub use domain::{DecodeError, Patch};
