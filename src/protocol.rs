//! Action vocabulary shared by the controller, the relay and the client.
//!
//! Every action carries an explicit, stable numeric code. Codes travel as
//! decimal text: newline-terminated on the controller link, and as the event
//! name on the client channel. Never renumber an existing action; add new ones
//! with fresh codes and bump [`PROTOCOL_VERSION`].

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// Version of the action vocabulary.
pub const PROTOCOL_VERSION: u8 = 1;

/// Maximum accepted length of one controller line, in bytes.
pub const MAX_LINE_LEN: usize = 256;

/// Errors produced while decoding inbound actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Blank line or empty event name.
    Empty,
    /// Not a decimal integer.
    NotNumeric(String),
    /// A number that maps to no action at this boundary.
    UnknownCode(u32),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "empty message"),
            ProtocolError::NotNumeric(raw) => write!(f, "not a numeric action code: {:?}", raw),
            ProtocolError::UnknownCode(code) => write!(f, "unknown action code {}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

macro_rules! wire_actions {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every action at this boundary, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable wire code.
            pub const fn code(self) -> u8 {
                self as u8
            }

            pub const fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ProtocolError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                $name::from_code(code).ok_or(ProtocolError::UnknownCode(code as u32))
            }
        }

        impl FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ProtocolError::Empty);
                }
                let code: u32 = s
                    .parse()
                    .map_err(|_| ProtocolError::NotNumeric(s.to_string()))?;
                u8::try_from(code)
                    .ok()
                    .and_then($name::from_code)
                    .ok_or(ProtocolError::UnknownCode(code))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

wire_actions! {
    /// Sent by the controller to the relay.
    pub enum ControllerAction {
        /// Controller booted and wants a handshake.
        Ready = 0,
        Left = 1,
        Right = 2,
        Up = 3,
        Down = 4,
        Fire = 5,
        ResetGame = 6,
        /// Controller could not decode something the relay sent.
        UnknownActionReceived = 7,
    }
}

wire_actions! {
    /// Sent by the relay to the controller.
    pub enum RelayAction {
        /// Reply to [`ControllerAction::Ready`].
        Connected = 0,
        /// A client is attached and the game can start.
        ReadyForGame = 1,
        Sunk = 2,
        Win = 3,
    }
}

wire_actions! {
    /// Sent by the relay to the client.
    pub enum GameAction {
        Left = 0,
        Right = 1,
        Up = 2,
        Down = 3,
        Fire = 4,
        ResetGame = 5,
    }
}

wire_actions! {
    /// Sent by the client to the relay when the game state changes.
    pub enum GameStateEvent {
        Sunk = 0,
        Win = 1,
    }
}

impl ControllerAction {
    /// The client action this controller action is forwarded as, if any.
    pub const fn game_action(self) -> Option<GameAction> {
        match self {
            ControllerAction::Left => Some(GameAction::Left),
            ControllerAction::Right => Some(GameAction::Right),
            ControllerAction::Up => Some(GameAction::Up),
            ControllerAction::Down => Some(GameAction::Down),
            ControllerAction::Fire => Some(GameAction::Fire),
            ControllerAction::ResetGame => Some(GameAction::ResetGame),
            ControllerAction::Ready | ControllerAction::UnknownActionReceived => None,
        }
    }
}

impl From<GameStateEvent> for RelayAction {
    fn from(event: GameStateEvent) -> Self {
        match event {
            GameStateEvent::Sunk => RelayAction::Sunk,
            GameStateEvent::Win => RelayAction::Win,
        }
    }
}

/// One decoded line from the controller link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFrame {
    /// `#`-prefixed human readable text, never an action.
    Debug(String),
    Action(ControllerAction),
}

/// Decode one line received from the controller.
pub fn decode_link_line(line: &str) -> Result<LinkFrame, ProtocolError> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix('#') {
        return Ok(LinkFrame::Debug(text.trim().to_string()));
    }
    line.parse().map(LinkFrame::Action)
}

/// Encode an action for the controller link, newline terminated.
pub fn encode_link_action(action: RelayAction) -> String {
    let mut out = action.to_string();
    out.push('\n');
    out
}
