//! Session timing configuration.

use std::time::Duration;

/// Upper bound on a single frame write.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `close` waits for the peer to acknowledge before tearing the
/// transport down.
pub const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Longest silence tolerated on the read side before the connection is
/// declared dead.
pub const READ_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for dialing and the opening handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeouts governing one [`CallSession`](crate::CallSession).
///
/// Start from `SessionConfig::default()` and override what you need:
///
/// ```rust
/// use std::time::Duration;
/// use pbxlink_session::SessionConfig;
///
/// let config = SessionConfig {
///     connect_timeout: Duration::from_secs(5),
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.write_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Deadline for [`CallSession::open`](crate::CallSession::open).
    pub connect_timeout: Duration,

    /// Deadline for each frame written by `send`.
    pub write_timeout: Duration,

    /// Grace period `close` grants the peer to answer the close frame.
    pub close_grace: Duration,

    /// Rolling read inactivity deadline. Expiry is fatal; there is no
    /// keepalive ping.
    pub read_idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
            close_grace: CLOSE_GRACE,
            read_idle_timeout: READ_IDLE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert_eq!(config.close_grace, Duration::from_secs(5));
        assert_eq!(config.read_idle_timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }
}
