//! Domain errors.

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// A claim payload must contain at least one character
    #[error("Payload must not be empty")]
    EmptyPayload,
}

/// Errors raised by the slot board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// The requested index is not in `[0, len)`
    #[error("Slot index {index} is out of range (slot count: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while pushing messages to connected clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection is not registered
    #[error("Connection '{0}' is not registered")]
    ClientNotFound(String),

    /// The connection's outbound channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The snapshot could not be encoded for the wire
    #[error("Failed to encode snapshot: {0}")]
    EncodeFailed(String),
}
