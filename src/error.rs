use std::path::PathBuf;
use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while bridging zone state to the display engine
#[derive(Error, Debug)]
pub enum BridgeError {
    /// WebSocket error on the zone feed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Zone feed connection was closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// HTTP transport error talking to the display engine
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Display engine answered with a non-success status
    #[error("Display engine rejected {endpoint}: HTTP {status}")]
    HttpStatus {
        /// Endpoint that was called
        endpoint: String,
        /// HTTP status code returned
        status: u16,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The display engine's address file does not exist
    #[error("Display engine address file not found: {}", .0.display())]
    DiscoveryFileMissing(PathBuf),

    /// The display engine's address file could not be understood
    #[error("Malformed display engine address file {}: {reason}", .path.display())]
    DiscoveryMalformed {
        /// File that was read
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// No address file location is known on this platform
    #[error("No display engine address file location for this platform")]
    NoDiscoveryPath,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Whether this error came from locating the display engine.
    ///
    /// Discovery errors are recoverable: callers retry with backoff.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            BridgeError::DiscoveryFileMissing(_)
                | BridgeError::DiscoveryMalformed { .. }
                | BridgeError::NoDiscoveryPath
        )
    }
}
