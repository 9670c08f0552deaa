use std::fmt::{Error, Result, Write as _};

use super::{MessageValue, ProtobufValue};

/// Format a value tree in a readable, indented style.
///
/// Scalars and enums are rendered in one line; messages list their fields in
/// schema declaration order (single, repeated, one-of, map), map entries in
/// insertion order.
pub fn format_value(value: &ProtobufValue) -> std::result::Result<String, Error> {
    match value {
        ProtobufValue::Message(message) => format_message_value(message),
        ProtobufValue::Primitive(v) => Ok(format!("{}\n", v.value)),
        ProtobufValue::Enum(v) => Ok(format!("{}\n", v.selected)),
    }
}

pub(crate) fn format_message_value(message: &MessageValue) -> std::result::Result<String, Error> {
    let mut out = String::new();
    writeln!(out, "{}", message.ty.name)?;
    format_fields(message, 4, &mut out)?;
    Ok(out)
}

fn format_fields(message: &MessageValue, indent: usize, out: &mut String) -> Result {
    let pad = " ".repeat(indent);

    for (name, value) in &message.single_fields {
        format_labeled(name, value, indent, out)?;
    }
    for (name, values) in &message.repeated_fields {
        if values.is_empty() {
            writeln!(out, "{pad}{name}: []")?;
            continue;
        }
        writeln!(out, "{pad}{name}:")?;
        for (i, value) in values.iter().enumerate() {
            format_labeled(&format!("[{i}]"), value, indent + 4, out)?;
        }
    }
    for (union_name, (option, value)) in &message.one_of_fields {
        format_labeled(&format!("{option} (oneof {union_name})"), value, indent, out)?;
    }
    for (name, entries) in &message.map_fields {
        if entries.is_empty() {
            writeln!(out, "{pad}{name}: {{}}")?;
            continue;
        }
        writeln!(out, "{pad}{name}:")?;
        for (key, value) in entries {
            format_labeled(&format!("{key:?}"), value, indent + 4, out)?;
        }
    }

    Ok(())
}

fn format_labeled(label: &str, value: &ProtobufValue, indent: usize, out: &mut String) -> Result {
    let pad = " ".repeat(indent);
    match value {
        ProtobufValue::Primitive(v) => writeln!(out, "{pad}{label}: {}", v.value),
        ProtobufValue::Enum(v) => writeln!(out, "{pad}{label}: {}", v.selected),
        ProtobufValue::Message(m) if m.is_empty() => {
            writeln!(out, "{pad}{label}: {} {{}}", m.ty.name)
        }
        ProtobufValue::Message(m) => {
            writeln!(out, "{pad}{label}: {}", m.ty.name)?;
            format_fields(m, indent + 4, out)
        }
    }
}
