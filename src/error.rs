//! Error types for maxpb.

use thiserror::Error;

use crate::protocol::CommandCode;

/// Main error type for all maxpb operations.
///
/// Malformed input on the receive path is not an error: the reassembler
/// reports it as a [`crate::protocol::FrameEvent::FrameRejected`] event.
#[derive(Debug, Error)]
pub enum MaxPbError {
    /// I/O error on the underlying byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Payload does not fit in the frame's size field or the configured limit.
    #[error("Payload size {size} exceeds maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },

    /// Message type is not part of the command table.
    #[error("Unknown command code: {0:#06x}")]
    UnknownCommand(u16),

    /// No handler registered for a known command.
    #[error("Handler not found for command: {0:?}")]
    HandlerNotFound(CommandCode),

    /// Payload is encrypted or compressed in a way the codec cannot handle.
    #[error("Unsupported payload format: {0}")]
    UnsupportedFormat(String),

    /// Connection or writer task closed.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using MaxPbError.
pub type Result<T> = std::result::Result<T, MaxPbError>;
