use core::time::Duration;

/// Rows and columns of the (square) game board.
pub const GRID_SIZE: u8 = 8;
/// Shortest boat the placement generator draws.
pub const MIN_BOAT_LEN: u8 = 2;
/// Longest boat the placement generator draws.
pub const MAX_BOAT_LEN: u8 = 7;
/// Boats per fleet unless configured otherwise.
pub const DEFAULT_FLEET_SIZE: usize = 3;
/// Rejected draws allowed for a single boat before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;
/// Where the cursor sits at the start of every game.
pub const CURSOR_START: (u8, u8) = (3, 3);
/// Minimum interval between two actions forwarded to the client.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

#[cfg(feature = "std")]
pub use self::relay_config::*;

#[cfg(feature = "std")]
mod relay_config {
    use std::fmt;
    use std::net::SocketAddr;
    use std::string::String;
    use std::time::Duration;

    use crate::relay::AttachPolicy;
    use crate::transport::line::LinkEndpoint;

    /// Default bind address for the client channel.
    pub const DEFAULT_LISTEN: &str = "0.0.0.0:4000";
    /// Default origin allowed to open the client channel.
    pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
    /// Pause between attempts to (re)open the controller link.
    pub const LINK_RETRY_DELAY: Duration = Duration::from_secs(2);

    /// Everything the relay process needs at start-up.
    #[derive(Debug, Clone)]
    pub struct RelayConfig {
        pub link: LinkEndpoint,
        pub listen: SocketAddr,
        /// `None` accepts any origin.
        pub allowed_origin: Option<String>,
        pub attach_policy: AttachPolicy,
        pub debounce: Duration,
        pub link_retry: Duration,
    }

    impl RelayConfig {
        /// Build a configuration from raw operator input.
        pub fn from_args(
            link: &str,
            listen: &str,
            allowed_origin: Option<&str>,
            attach_policy: AttachPolicy,
        ) -> Result<Self, ConfigError> {
            let link = LinkEndpoint::parse(link)?;
            let listen = listen
                .parse()
                .map_err(|_| ConfigError::InvalidListenAddress(listen.into()))?;
            let allowed_origin = match allowed_origin.map(str::trim) {
                None | Some("") | Some("*") => None,
                Some(origin) => {
                    if !origin.is_ascii()
                        || origin.chars().any(char::is_whitespace)
                        || axum::http::HeaderValue::from_str(origin).is_err()
                    {
                        return Err(ConfigError::InvalidOrigin(origin.into()));
                    }
                    Some(origin.into())
                }
            };
            Ok(Self {
                link,
                listen,
                allowed_origin,
                attach_policy,
                debounce: super::DEBOUNCE_WINDOW,
                link_retry: LINK_RETRY_DELAY,
            })
        }
    }

    /// Start-up configuration errors. All of them are fatal.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        InvalidListenAddress(String),
        InvalidOrigin(String),
        InvalidLinkEndpoint(String),
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ConfigError::InvalidListenAddress(a) => write!(f, "invalid listen address '{}'", a),
                ConfigError::InvalidOrigin(o) => write!(f, "invalid client origin '{}'", o),
                ConfigError::InvalidLinkEndpoint(e) => write!(f, "invalid controller link '{}'", e),
            }
        }
    }

    impl std::error::Error for ConfigError {}
}
