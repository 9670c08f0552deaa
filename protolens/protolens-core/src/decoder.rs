//! Boundary trait for the external wire-format decoder.

use serde_json::Value as JsonValue;

use crate::error::DecoderError;

/// Decodes wire bytes of a named message type into its generic JSON form.
///
/// Implementations own the schema they decode against (for protobuf, a
/// descriptor pool) and are shared read-only across decode calls.
pub trait WireDecoder: Send + Sync {
    /// Decode `message_data` as an instance of `message_name`.
    fn decode_json(&self, message_name: &str, message_data: &[u8])
    -> Result<JsonValue, DecoderError>;

    /// User-facing, single-line description of a decoder failure.
    fn describe_error(&self, error: &DecoderError) -> String {
        error.to_string()
    }
}
