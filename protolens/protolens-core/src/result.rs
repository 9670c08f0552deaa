//! Decode orchestration and its two-tier result.

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::{
    builder::{build_message, json_kind},
    context::ProtoCtx,
    decoder::WireDecoder,
    error::{DeserializeError, DeserializeErrorKind},
    schema::ProtobufType,
    value::MessageValue,
};

/// Prefix of every typed-build error reported through [`DecodeResult`].
pub const DESERIALIZE_ERROR_PREFIX: &str =
    "Error while parsing the JSON representation of the protobuf message:\n";

/// Outcome of [`deserialize`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    /// Bytes decoded and the generic value was built into a typed tree.
    Valid { value: MessageValue },
    /// Decoding or typing failed.
    ///
    /// `raw` is `None` when the wire decoder failed, and the pretty-printed
    /// generic value when only the typed build failed.
    Invalid { raw: Option<String>, error: String },
}

impl DecodeResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, DecodeResult::Valid { .. })
    }

    pub fn value(&self) -> Option<&MessageValue> {
        match self {
            DecodeResult::Valid { value } => Some(value),
            DecodeResult::Invalid { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<MessageValue> {
        match self {
            DecodeResult::Valid { value } => Some(value),
            DecodeResult::Invalid { .. } => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            DecodeResult::Valid { .. } => None,
            DecodeResult::Invalid { raw, .. } => raw.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DecodeResult::Valid { .. } => None,
            DecodeResult::Invalid { error, .. } => Some(error),
        }
    }
}

/// Decode `message_data` as `message_name` and build a typed tree from it.
///
/// Wire failures yield `Invalid { raw: None, .. }` with the decoder's own
/// description; build failures keep the decoded generic value, pretty-printed,
/// in `raw`.
pub fn deserialize(
    decoder: &dyn WireDecoder,
    message_data: &[u8],
    message_name: &str,
    ctx: &ProtoCtx,
) -> DecodeResult {
    let decoded = match decoder.decode_json(message_name, message_data) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(message_name, error = %e, "wire decode failed");
            return DecodeResult::Invalid {
                raw: None,
                error: decoder.describe_error(&e),
            };
        }
    };

    match build_root(message_name, &decoded, ctx) {
        Ok(value) => DecodeResult::Valid { value },
        Err(e) => {
            debug!(message_name, error = %e, "typed build failed");
            let raw = serde_json::to_string_pretty(&decoded).unwrap_or_else(|_| decoded.to_string());
            DecodeResult::Invalid {
                raw: Some(raw),
                error: format!("{DESERIALIZE_ERROR_PREFIX}{e}"),
            }
        }
    }
}

fn build_root(
    message_name: &str,
    decoded: &JsonValue,
    ctx: &ProtoCtx,
) -> Result<MessageValue, DeserializeError> {
    let message_ty = match ctx.resolve_type(message_name)? {
        ProtobufType::Message(message_ty) => message_ty,
        other => {
            return Err(DeserializeError::new(DeserializeErrorKind::TypeMismatch {
                expected: "message",
                actual: other.kind_name(),
            }));
        }
    };
    match decoded {
        JsonValue::Object(object) => build_message(&message_ty, object, ctx),
        JsonValue::Null => build_message(&message_ty, &Map::new(), ctx),
        other => Err(DeserializeError::new(DeserializeErrorKind::TypeMismatch {
            expected: "object",
            actual: json_kind(other),
        })),
    }
}
