//! The realtime event bridge.
//!
//! Owns exactly one live WebSocket connection per session identity,
//! decodes typed push events, and fans each one out to the correct
//! partial refresh (job store, provider directory, subscription state)
//! via the [`RefreshHandler`] seam. Dropped connections are re-opened
//! by a jittered exponential-backoff reconnect loop whose state is
//! surfaced on a watch channel.

pub mod bridge;
pub mod client;
pub mod dispatch;
pub mod messages;
pub mod reconnect;

pub use bridge::{BridgeHandle, BridgeStatus, RealtimeBridge};
pub use client::{RealtimeClient, RealtimeClientError, RealtimeConnection};
pub use dispatch::RefreshHandler;
pub use messages::{parse_event, PushEvent};
pub use reconnect::ReconnectConfig;
