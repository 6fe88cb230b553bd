//! Write halves of the two relay transports.
//!
//! Inbound traffic never goes through these traits: readers turn every line or
//! channel message into a [`crate::relay::RelayEvent`] on the session queue.

use crate::protocol::{GameAction, RelayAction};

/// Outbound half of the controller link.
#[async_trait::async_trait]
pub trait LinkWriter: Send {
    async fn send(&mut self, action: RelayAction) -> anyhow::Result<()>;
}

/// Outbound half of one client channel.
#[async_trait::async_trait]
pub trait ChannelSender: Send {
    async fn emit(&mut self, action: GameAction) -> anyhow::Result<()>;
}

#[cfg(unix)]
pub mod device;
pub mod in_memory;
pub mod line;
pub mod websocket;
