//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Malformed JSON, a missing field, or a value out of range (for
    /// example a square off the board).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Well-formed JSON that breaks a protocol rule, e.g. `MAKE_MOVE`
    /// without a `move`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
