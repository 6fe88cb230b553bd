//! Queue-backed transports for tests, the simulator and local play.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::protocol::{GameAction, RelayAction};
use crate::transport::{ChannelSender, LinkWriter};

/// Link whose writes land on an unbounded queue.
pub struct InMemoryLink {
    tx: UnboundedSender<RelayAction>,
}

impl InMemoryLink {
    /// The link plus the receiving end standing in for the controller.
    /// Dropping the receiver makes every later write fail.
    pub fn new() -> (Self, UnboundedReceiver<RelayAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl LinkWriter for InMemoryLink {
    async fn send(&mut self, action: RelayAction) -> anyhow::Result<()> {
        self.tx
            .send(action)
            .map_err(|_| anyhow::anyhow!("Controller link closed"))
    }
}

/// Client channel whose emissions land on an unbounded queue.
pub struct InMemoryChannel {
    tx: UnboundedSender<GameAction>,
}

impl InMemoryChannel {
    /// The channel plus the receiving end standing in for the client.
    pub fn new() -> (Self, UnboundedReceiver<GameAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl ChannelSender for InMemoryChannel {
    async fn emit(&mut self, action: GameAction) -> anyhow::Result<()> {
        self.tx
            .send(action)
            .map_err(|_| anyhow::anyhow!("Client channel closed"))
    }
}
