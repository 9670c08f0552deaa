//! Convert a protobuf `FileDescriptorSet` into a [`SchemaRegistry`].

use prost_reflect::{DescriptorPool, EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor};
use protolens_core::{DecoderError, EnumType, MessageType, SchemaRegistry};
use tracing::debug;

/// Parse a serialized `google.protobuf.FileDescriptorSet`.
pub fn parse_descriptor_pool(schema_data: &[u8]) -> Result<DescriptorPool, DecoderError> {
    DescriptorPool::decode(schema_data).map_err(|e| DecoderError::SchemaParse {
        source: Box::new(e),
    })
}

/// Build a [`SchemaRegistry`] from serialized `FileDescriptorSet` bytes.
pub fn load_registry(schema_data: &[u8]) -> Result<SchemaRegistry, DecoderError> {
    let pool = parse_descriptor_pool(schema_data)?;
    registry_from_pool(&pool)
}

/// Register every message and enum of `pool` under its fully-qualified name.
///
/// Synthetic map entry messages are not registered; map fields refer to
/// their entry's value type directly.
pub fn registry_from_pool(pool: &DescriptorPool) -> Result<SchemaRegistry, DecoderError> {
    let mut registry = SchemaRegistry::new();
    for enum_desc in pool.all_enums() {
        registry.insert(enum_type(&enum_desc));
    }
    for message_desc in pool.all_messages() {
        if message_desc.is_map_entry() {
            continue;
        }
        registry.insert(message_type(&message_desc)?);
    }
    debug!(types = registry.len(), "loaded schema registry");
    Ok(registry)
}

fn enum_type(desc: &EnumDescriptor) -> EnumType {
    let options = desc
        .values()
        .map(|v| (v.name().to_string(), v.number()))
        .collect();
    EnumType::new(desc.full_name(), options)
}

fn message_type(desc: &MessageDescriptor) -> Result<MessageType, DecoderError> {
    let mut message = MessageType::new(desc.full_name());

    for field in desc.fields() {
        let name = field.name().to_string();
        if field.is_map() {
            let value_field = map_value_field(desc, &field)?;
            message.map_fields.push((name, kind_type_name(&value_field.kind())));
        } else if field.is_list() {
            message.repeated_fields.push((name, kind_type_name(&field.kind())));
        } else if field
            .containing_oneof()
            .is_some_and(|oneof| !oneof.is_synthetic())
        {
            // Collected per union below.
            continue;
        } else {
            message.single_fields.push((name, kind_type_name(&field.kind())));
        }
    }

    for oneof in desc.oneofs().filter(|oneof| !oneof.is_synthetic()) {
        let options = oneof
            .fields()
            .map(|f| (f.name().to_string(), kind_type_name(&f.kind())))
            .collect();
        message.one_of_fields.push((oneof.name().to_string(), options));
    }

    Ok(message)
}

fn map_value_field(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
) -> Result<FieldDescriptor, DecoderError> {
    let Kind::Message(entry_desc) = field.kind() else {
        return Err(DecoderError::SchemaInvalid {
            type_name: desc.full_name().to_string(),
            detail: format!(
                "map field `{}` has non-message kind: {:?}",
                field.name(),
                field.kind()
            ),
        });
    };
    entry_desc
        .get_field_by_name("value")
        .ok_or_else(|| DecoderError::SchemaInvalid {
            type_name: desc.full_name().to_string(),
            detail: format!("map entry `{}` missing value field", field.name()),
        })
}

/// Type name used in the schema model for a field kind.
fn kind_type_name(kind: &Kind) -> String {
    let name = match kind {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(md) => return md.full_name().to_string(),
        Kind::Enum(ed) => return ed.full_name().to_string(),
    };
    name.to_string()
}
