use serde_json::{Map, Value as JsonValue};

use super::{MessageValue, ProtobufValue};

/// Re-serialize a value tree into the generic JSON form the builder consumes.
///
/// Primitives become strings, enums their option name, one-of unions the key
/// of their selected option and maps objects in entry order. Building the
/// result again against the same schema yields an equal tree.
pub fn to_json(value: &ProtobufValue) -> JsonValue {
    match value {
        ProtobufValue::Primitive(v) => JsonValue::String(v.value.clone()),
        ProtobufValue::Enum(v) => JsonValue::String(v.selected.clone()),
        ProtobufValue::Message(m) => JsonValue::Object(message_to_json(m)),
    }
}

fn message_to_json(message: &MessageValue) -> Map<String, JsonValue> {
    let mut out = Map::new();
    for (name, value) in &message.single_fields {
        out.insert(name.clone(), to_json(value));
    }
    for (name, values) in &message.repeated_fields {
        out.insert(name.clone(), values.iter().map(to_json).collect());
    }
    for (_, (option, value)) in &message.one_of_fields {
        out.insert(option.clone(), to_json(value));
    }
    for (name, entries) in &message.map_fields {
        let entries = entries
            .iter()
            .map(|(key, value)| (key.clone(), to_json(value)))
            .collect();
        out.insert(name.clone(), JsonValue::Object(entries));
    }
    out
}
