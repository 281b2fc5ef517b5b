//! Error types for the candle client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A line typed by the user is not a valid command
    #[error("{0}")]
    InvalidCommand(String),
}
