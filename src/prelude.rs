//! Commonly used types and utilities for ease of import.

pub use crate::{
    Boat, BoardSnapshot, Coord, Fleet, FleetError, GameAction, GameClient, GameState,
    GameStateEvent, GameStatus, Orientation, RelayAction, ShotOutcome,
};

#[cfg(feature = "std")]
pub use crate::{init_logging, print_game, AttachPolicy, RelayEvent, RelaySession};

#[cfg(feature = "std")]
pub use crate::transport::{
    in_memory::{InMemoryChannel, InMemoryLink},
    line::{LineLink, LinkEndpoint},
    ChannelSender, LinkWriter,
};
