//! Error handling for the templog crate.

/// A specialized `Result` type for templog operations.
pub type Result<T> = std::result::Result<T, TemplogError>;

/// The main error type for templog operations.
///
/// Every variant is fatal to the current cycle; malformed buffer lines are
/// the one recoverable condition and carry their own type,
/// [`crate::buffer::EntryParseError`].
#[derive(Debug, thiserror::Error)]
pub enum TemplogError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or understood
    #[error("configuration error: {0}")]
    Config(String),

    /// The one-wire sensor could not be read
    #[error("sensor read failed: {0}")]
    SensorRead(String),

    /// The remote store could not be reached
    #[error("remote store unreachable: {0}")]
    RemoteConnect(String),

    /// A single insert into the remote store failed
    #[error("remote insert failed: {0}")]
    RemoteInsert(String),

    /// The healthcheck endpoint rejected or never received the ping
    #[error("healthcheck ping failed: {0}")]
    Healthcheck(String),
}

impl TemplogError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new sensor error
    pub fn sensor_error(msg: impl Into<String>) -> Self {
        Self::SensorRead(msg.into())
    }

    /// Create a new remote-connect error
    pub fn remote_connect_error(msg: impl Into<String>) -> Self {
        Self::RemoteConnect(msg.into())
    }

    /// Create a new remote-insert error
    pub fn remote_insert_error(msg: impl Into<String>) -> Self {
        Self::RemoteInsert(msg.into())
    }

    /// Create a new healthcheck error
    pub fn healthcheck_error(msg: impl Into<String>) -> Self {
        Self::Healthcheck(msg.into())
    }
}
