//! The relay between the controller link and the client channel.
//!
//! Readers on both sides turn inbound traffic into [`RelayEvent`]s on a
//! single queue. A [`RelaySession`] owns both write halves and handles the
//! events one at a time.

use std::fmt;

use crate::protocol::GameStateEvent;
use crate::transport::{ChannelSender, LinkWriter};

pub mod debounce;
pub mod session;

pub use debounce::Debounce;
pub use session::RelaySession;

/// Identifies one client channel for the lifetime of the process.
pub type ClientId = u64;

/// What happens when a client attaches while another one is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AttachPolicy {
    /// The newcomer takes the slot.
    #[default]
    Replace,
    /// The newcomer is refused until the slot is free.
    Reject,
}

/// Inbound traffic, in arrival order.
pub enum RelayEvent {
    /// One raw line from the controller, terminator included if present.
    LinkLine(String),
    /// A (re)opened controller link replaces the current write half.
    LinkOpened {
        link: Box<dyn LinkWriter>,
    },
    /// The controller link reached end of stream.
    LinkClosed,
    ClientAttached {
        id: ClientId,
        channel: Box<dyn ChannelSender>,
    },
    ClientEvent {
        id: ClientId,
        event: GameStateEvent,
    },
    ClientDetached {
        id: ClientId,
    },
}

impl fmt::Debug for RelayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayEvent::LinkLine(line) => f.debug_tuple("LinkLine").field(line).finish(),
            RelayEvent::LinkOpened { .. } => f.debug_struct("LinkOpened").finish_non_exhaustive(),
            RelayEvent::LinkClosed => write!(f, "LinkClosed"),
            RelayEvent::ClientAttached { id, .. } => {
                f.debug_struct("ClientAttached").field("id", id).finish_non_exhaustive()
            }
            RelayEvent::ClientEvent { id, event } => f
                .debug_struct("ClientEvent")
                .field("id", id)
                .field("event", event)
                .finish(),
            RelayEvent::ClientDetached { id } => {
                f.debug_struct("ClientDetached").field("id", id).finish()
            }
        }
    }
}
