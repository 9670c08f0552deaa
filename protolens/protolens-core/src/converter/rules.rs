//! Declarative converter rules loadable from JSON configuration.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use super::ValueConverter;
use crate::{
    error::ConversionError,
    schema::{DefaultValue, PrimitiveType},
    value::{MessageValue, PrimitiveValue, ProtobufValue},
};

/// A built-in transformation applied to values of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConverterRule {
    /// Replace the value with fixed text.
    Constant { value: String },
    /// Replace a message with one of its single fields.
    Unwrap { field: String },
    /// Render a `seconds`/`nanos` message as an RFC 3339 UTC timestamp.
    Timestamp,
    /// Render a `seconds`/`nanos` message as a duration such as `1.5s`.
    Duration,
    /// Join the text of a message's single fields.
    Join {
        #[serde(default = "default_separator")]
        separator: String,
    },
}

fn default_separator() -> String {
    ", ".to_string()
}

/// One `(type name, rule)` entry of a [`ConverterConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterEntry {
    pub type_name: String,
    pub rule: ConverterRule,
}

/// Converter configuration, e.g.
///
/// ```json
/// { "converters": [
///     { "type_name": "google.protobuf.Timestamp", "rule": { "kind": "timestamp" } }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub converters: Vec<ConverterEntry>,
}

impl ConverterConfig {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse raw file contents; invalid UTF-8 is an error.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl ValueConverter for ConverterRule {
    fn convert(&self, value: ProtobufValue) -> Result<ProtobufValue, ConversionError> {
        match self {
            ConverterRule::Constant { value: text } => Ok(text_value(&value, text.clone())),
            ConverterRule::Unwrap { field } => {
                let message = into_message(value)?;
                let type_name = message.ty.name.clone();
                message
                    .single_fields
                    .into_iter()
                    .find(|(name, _)| name == field)
                    .map(|(_, inner)| inner)
                    .ok_or_else(|| format!("'{type_name}' has no field '{field}'").into())
            }
            ConverterRule::Timestamp => {
                let (seconds, nanos) = seconds_and_nanos(&value)?;
                let nanos = u32::try_from(nanos)
                    .map_err(|_| format!("negative nanos {nanos} in timestamp"))?;
                let timestamp = DateTime::from_timestamp(seconds, nanos)
                    .ok_or_else(|| format!("timestamp {seconds}.{nanos:09} is out of range"))?;
                let text = timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);
                Ok(text_value(&value, text))
            }
            ConverterRule::Duration => {
                let (seconds, nanos) = seconds_and_nanos(&value)?;
                Ok(text_value(&value, format_duration(seconds, nanos)))
            }
            ConverterRule::Join { separator } => {
                let message = as_message(&value)?;
                let text = message
                    .single_fields
                    .iter()
                    .map(|(_, field)| field.to_text())
                    .collect::<Vec<_>>()
                    .join(separator);
                Ok(text_value(&value, text))
            }
        }
    }
}

/// Primitive value carrying the original type name, so the replacement
/// still reports where it came from.
fn text_value(original: &ProtobufValue, text: String) -> ProtobufValue {
    let ty = PrimitiveType::new(original.type_name(), DefaultValue::String(String::new()));
    ProtobufValue::Primitive(PrimitiveValue {
        ty: Arc::new(ty),
        value: text,
    })
}

fn as_message(value: &ProtobufValue) -> Result<&MessageValue, ConversionError> {
    value
        .as_message()
        .ok_or_else(|| format!("'{}' is not a message", value.type_name()).into())
}

fn into_message(value: ProtobufValue) -> Result<MessageValue, ConversionError> {
    match value {
        ProtobufValue::Message(message) => Ok(message),
        other => Err(format!("'{}' is not a message", other.type_name()).into()),
    }
}

fn seconds_and_nanos(value: &ProtobufValue) -> Result<(i64, i32), ConversionError> {
    let message = as_message(value)?;
    let seconds = integer_field(message, "seconds")?;
    let nanos = integer_field(message, "nanos")?;
    Ok((seconds, nanos))
}

fn integer_field<T: std::str::FromStr>(
    message: &MessageValue,
    name: &str,
) -> Result<T, ConversionError> {
    let field = message
        .single(name)
        .and_then(ProtobufValue::as_primitive)
        .ok_or_else(|| format!("'{}' has no scalar field '{name}'", message.ty.name))?;
    field
        .value
        .parse()
        .map_err(|_| format!("field '{name}' is not an integer: '{}'", field.value).into())
}

fn format_duration(seconds: i64, nanos: i32) -> String {
    let sign = if seconds < 0 || nanos < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    let nanos = nanos.unsigned_abs();
    if nanos == 0 {
        return format!("{sign}{seconds}s");
    }
    let fraction = format!("{nanos:09}");
    format!("{sign}{seconds}.{}s", fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_text() {
        assert_eq!(format_duration(1, 500_000_000), "1.5s");
        assert_eq!(format_duration(-1, -250_000_000), "-1.25s");
        assert_eq!(format_duration(0, -1), "-0.000000001s");
        assert_eq!(format_duration(3, 0), "3s");
    }

    #[test]
    fn config_parses_rule_kinds() {
        let config = ConverterConfig::from_json_str(
            r#"{ "converters": [
                { "type_name": "a.Time", "rule": { "kind": "timestamp" } },
                { "type_name": "a.Name", "rule": { "kind": "join" } },
                { "type_name": "a.Wrap", "rule": { "kind": "unwrap", "field": "value" } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(config.converters.len(), 3);
        assert_eq!(config.converters[0].rule, ConverterRule::Timestamp);
        assert_eq!(
            config.converters[1].rule,
            ConverterRule::Join {
                separator: ", ".to_string()
            }
        );
    }
}
