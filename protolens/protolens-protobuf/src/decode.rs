//! Decode protobuf payloads into the generic JSON form.

use std::cmp::Ordering;

use base64::{Engine, engine::general_purpose::STANDARD};
use prost_reflect::{
    DescriptorPool, DynamicMessage, EnumDescriptor, Kind, MapKey, ReflectMessage,
    Value as ProtoValue,
};
use protolens_core::{DecoderError, WireDecoder, normalize_type_name};
use serde_json::{Map, Number, Value as JsonValue};

use crate::{diagnostics::normalize_error, schema::parse_descriptor_pool};

/// Decoder holding a parsed descriptor pool, reused for every payload.
#[derive(Debug, Clone)]
pub struct ProtobufDecoder {
    pool: DescriptorPool,
}

impl ProtobufDecoder {
    pub fn new(pool: DescriptorPool) -> Self {
        Self { pool }
    }

    /// Build a decoder from serialized `FileDescriptorSet` bytes.
    pub fn from_descriptor_set(schema_data: &[u8]) -> Result<Self, DecoderError> {
        parse_descriptor_pool(schema_data).map(Self::new)
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Decode wire bytes into a [`DynamicMessage`] of type `message_name`.
    pub fn decode_message(
        &self,
        message_name: &str,
        message_data: &[u8],
    ) -> Result<DynamicMessage, DecoderError> {
        let desc = self
            .pool
            .get_message_by_name(normalize_type_name(message_name))
            .ok_or_else(|| DecoderError::MessageNotFound {
                message_name: message_name.to_string(),
            })?;
        DynamicMessage::decode(desc, message_data).map_err(|e| DecoderError::MessageDecode {
            message_name: message_name.to_string(),
            source: Box::new(e),
        })
    }
}

impl WireDecoder for ProtobufDecoder {
    fn decode_json(
        &self,
        message_name: &str,
        message_data: &[u8],
    ) -> Result<JsonValue, DecoderError> {
        let message = self.decode_message(message_name, message_data)?;
        Ok(message_to_json(&message))
    }

    fn describe_error(&self, error: &DecoderError) -> String {
        normalize_error(error)
    }
}

/// Decode a serialized protobuf message into its generic JSON form.
///
/// `schema_name` is the fully-qualified protobuf message name.
/// `schema_data` must be a valid serialized
/// `google.protobuf.FileDescriptorSet`.
pub fn decode_protobuf_to_json(
    schema_name: &str,
    schema_data: &[u8],
    message_data: &[u8],
) -> Result<JsonValue, DecoderError> {
    ProtobufDecoder::from_descriptor_set(schema_data)?.decode_json(schema_name, message_data)
}

/// Render a decoded message in its generic JSON form.
///
/// Only fields that are set appear, keyed by their proto names in
/// declaration order, so a one-of union shows exactly its selected option.
/// Enums are rendered by name (by number when the name is unknown), 64-bit
/// integers as strings, bytes as base64 and map entries sorted by key.
/// Well-known types are not special-cased.
pub fn message_to_json(msg: &DynamicMessage) -> JsonValue {
    let mut fields = Map::new();
    for field_desc in msg.descriptor().fields() {
        if !msg.has_field(&field_desc) {
            continue;
        }
        let value = msg.get_field(&field_desc);
        fields.insert(
            field_desc.name().to_string(),
            proto_value_to_json(value.as_ref(), &field_desc.kind()),
        );
    }
    JsonValue::Object(fields)
}

fn proto_value_to_json(value: &ProtoValue, kind: &Kind) -> JsonValue {
    match value {
        ProtoValue::Bool(v) => JsonValue::Bool(*v),
        ProtoValue::I32(v) => JsonValue::from(*v),
        ProtoValue::U32(v) => JsonValue::from(*v),
        ProtoValue::I64(v) => JsonValue::String(v.to_string()),
        ProtoValue::U64(v) => JsonValue::String(v.to_string()),
        ProtoValue::F32(v) => float_to_json(f64::from(*v)),
        ProtoValue::F64(v) => float_to_json(*v),
        ProtoValue::String(s) => JsonValue::String(s.clone()),
        ProtoValue::Bytes(b) => JsonValue::String(STANDARD.encode(b)),
        ProtoValue::EnumNumber(n) => match kind {
            Kind::Enum(ed) => enum_to_json(*n, ed),
            _ => JsonValue::from(*n),
        },
        ProtoValue::Message(m) => message_to_json(m),
        ProtoValue::List(items) => items
            .iter()
            .map(|v| proto_value_to_json(v, kind))
            .collect(),
        ProtoValue::Map(map) => {
            let value_kind = match kind {
                Kind::Message(entry_desc) if entry_desc.is_map_entry() => {
                    entry_desc.map_entry_value_field().kind()
                }
                _ => kind.clone(),
            };
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| compare_map_keys(a, b));
            let object = entries
                .into_iter()
                .map(|(k, v)| (map_key_to_string(k), proto_value_to_json(v, &value_kind)))
                .collect();
            JsonValue::Object(object)
        }
    }
}

fn enum_to_json(n: i32, ed: &EnumDescriptor) -> JsonValue {
    match ed.get_value(n) {
        Some(v) => JsonValue::String(v.name().to_string()),
        None => JsonValue::from(n),
    }
}

fn float_to_json(v: f64) -> JsonValue {
    match Number::from_f64(v) {
        Some(n) => JsonValue::Number(n),
        None if v.is_nan() => JsonValue::String("NaN".to_string()),
        None if v > 0.0 => JsonValue::String("Infinity".to_string()),
        None => JsonValue::String("-Infinity".to_string()),
    }
}

fn map_key_to_string(k: &MapKey) -> String {
    match k {
        MapKey::Bool(v) => v.to_string(),
        MapKey::I32(v) => v.to_string(),
        MapKey::I64(v) => v.to_string(),
        MapKey::U32(v) => v.to_string(),
        MapKey::U64(v) => v.to_string(),
        MapKey::String(s) => s.clone(),
    }
}

fn compare_map_keys(a: &MapKey, b: &MapKey) -> Ordering {
    match (a, b) {
        (MapKey::Bool(a), MapKey::Bool(b)) => a.cmp(b),
        (MapKey::I32(a), MapKey::I32(b)) => a.cmp(b),
        (MapKey::I64(a), MapKey::I64(b)) => a.cmp(b),
        (MapKey::U32(a), MapKey::U32(b)) => a.cmp(b),
        (MapKey::U64(a), MapKey::U64(b)) => a.cmp(b),
        (MapKey::String(a), MapKey::String(b)) => a.cmp(b),
        _ => map_key_to_string(a).cmp(&map_key_to_string(b)),
    }
}
