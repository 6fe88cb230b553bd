#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod boat;
mod client;
mod common;
mod config;
mod fleet;
mod game;
#[cfg(feature = "std")]
mod logging;
pub mod protocol;
#[cfg(feature = "std")]
pub mod relay;
mod snapshot;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
mod ui;

pub mod prelude;

pub use bitboard::{BitBoard, BitBoardError, Grid, SetBits};
pub use boat::*;
pub use client::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use protocol::*;
#[cfg(feature = "std")]
pub use relay::{AttachPolicy, ClientId, Debounce, RelayEvent, RelaySession};
pub use snapshot::*;
#[cfg(feature = "std")]
pub use transport::{
    in_memory::{InMemoryChannel, InMemoryLink},
    line::{DetachedLink, LineLink, LinkEndpoint},
    websocket::WsChannel,
    ChannelSender, LinkWriter,
};
#[cfg(feature = "std")]
pub use ui::*;
