//! Codec trait and the JSON implementation.
//!
//! The coordinator holds a codec by value and never names a concrete
//! format, so a binary codec can be swapped in without touching it.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to bytes and decodes bytes back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ```rust
/// use gambit_protocol::{Codec, GameId, JsonCodec, UserGameCommand};
///
/// let codec = JsonCodec;
/// let cmd = UserGameCommand::connect("token-1", GameId(7));
///
/// let bytes = codec.encode(&cmd).unwrap();
/// let decoded: UserGameCommand = codec.decode(&bytes).unwrap();
/// assert_eq!(cmd, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{GameId, GameRecord, ServerMessage};

    #[test]
    fn test_json_codec_encode_produces_valid_json() {
        let bytes = JsonCodec.encode(&ServerMessage::notification("hi")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["serverMessageType"], "NOTIFICATION");
    }

    #[test]
    fn test_json_codec_decode_malformed_returns_decode_error() {
        let result: Result<GameRecord, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_wrong_shape_returns_decode_error() {
        let result: Result<GameRecord, _> = JsonCodec.decode(br#"{"gameID":"seven"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_record_round_trip() {
        let record = GameRecord::new(GameId(3), "friendly");
        let bytes = JsonCodec.encode(&record).unwrap();
        let back: GameRecord = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(back, record);
    }
}
