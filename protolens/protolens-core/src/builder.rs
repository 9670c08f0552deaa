//! Schema-driven construction of typed values from generic decoded JSON.
//!
//! The builder walks a [`ProtobufType`] and the generic value side by side.
//! Type references are resolved by name through [`ProtoCtx`] at each field, so
//! recursive schemas are only expanded as deep as the input goes. `null` is
//! treated like an absent value everywhere. The first failure aborts the
//! whole build.

use std::sync::Arc;

use serde_json::{Map, Number, Value as JsonValue};

use crate::{
    context::ProtoCtx,
    error::{DeserializeError, DeserializeErrorKind, PathSegment},
    schema::{EnumType, MessageType, PrimitiveType, ProtobufType, canonical_f64},
    value::{EnumValue, MessageValue, PrimitiveValue, ProtobufValue},
};

/// Deepest message nesting the builder accepts, matching the recursion limit
/// of the protobuf wire decoder.
pub const RECURSION_LIMIT: usize = 100;

/// Build a typed value of type `ty` from `input`, then apply the first
/// matching custom converter of `ctx`.
///
/// `None` (or JSON `null`) selects the type's default: the declared default
/// for primitives, option `0` for enums and `{}` for messages.
pub fn build_value(
    ty: &ProtobufType,
    input: Option<&JsonValue>,
    ctx: &ProtoCtx,
) -> Result<ProtobufValue, DeserializeError> {
    build_value_at(ty, input, ctx, 0)
}

/// Build the fields of a message from a JSON object.
///
/// Custom converters are applied to every nested value but not to the
/// message itself. Nesting deeper than [`RECURSION_LIMIT`] messages fails
/// with [`DeserializeErrorKind::RecursionLimit`]; an absent self-referential
/// singular field defaults to `{}` at every level and always ends there.
pub fn build_message(
    ty: &Arc<MessageType>,
    input: &Map<String, JsonValue>,
    ctx: &ProtoCtx,
) -> Result<MessageValue, DeserializeError> {
    build_message_at(ty, input, ctx, 0)
}

fn build_value_at(
    ty: &ProtobufType,
    input: Option<&JsonValue>,
    ctx: &ProtoCtx,
    depth: usize,
) -> Result<ProtobufValue, DeserializeError> {
    let value = build_value_impl(ty, present(input), ctx, depth)?;
    ctx.converters().apply(value)
}

fn build_message_at(
    ty: &Arc<MessageType>,
    input: &Map<String, JsonValue>,
    ctx: &ProtoCtx,
    depth: usize,
) -> Result<MessageValue, DeserializeError> {
    if depth >= RECURSION_LIMIT {
        return Err(DeserializeError::new(DeserializeErrorKind::RecursionLimit {
            type_name: ty.name.clone(),
            limit: RECURSION_LIMIT,
        }));
    }
    let depth = depth + 1;

    let single_fields = ty
        .single_fields
        .iter()
        .map(|(name, type_name)| {
            let field_ty = ctx.resolve_type(type_name).map_err(at_field(name))?;
            let value = build_value_at(&field_ty, input.get(name), ctx, depth)
                .map_err(at_field(name))?;
            Ok((name.clone(), value))
        })
        .collect::<Result<Vec<_>, DeserializeError>>()?;

    let repeated_fields = ty
        .repeated_fields
        .iter()
        .map(|(name, type_name)| {
            let items: &[JsonValue] = match present(input.get(name)) {
                None => &[],
                Some(JsonValue::Array(items)) => items,
                Some(other) => return Err(type_mismatch("array", other).at_field(name)),
            };
            let item_ty = ctx.resolve_type(type_name).map_err(at_field(name))?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    build_value_at(&item_ty, Some(item), ctx, depth)
                        .map_err(|e| e.at(PathSegment::Index(i)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(at_field(name))?;
            Ok((name.clone(), values))
        })
        .collect::<Result<Vec<_>, DeserializeError>>()?;

    let one_of_fields = ty
        .one_of_fields
        .iter()
        .map(|(union_name, options)| {
            // Declaration order decides when several options are present.
            let (option, type_name) = options
                .iter()
                .find(|(option, _)| present(input.get(option)).is_some())
                .ok_or_else(|| {
                    DeserializeError::new(DeserializeErrorKind::MissingOneOf {
                        union_name: union_name.clone(),
                    })
                })?;
            let option_ty = ctx.resolve_type(type_name).map_err(at_field(option))?;
            let value = build_value_at(&option_ty, input.get(option), ctx, depth)
                .map_err(at_field(option))?;
            Ok((union_name.clone(), (option.clone(), value)))
        })
        .collect::<Result<Vec<_>, DeserializeError>>()?;

    let map_fields = ty
        .map_fields
        .iter()
        .map(|(name, value_type_name)| {
            let empty = Map::new();
            let entries = match present(input.get(name)) {
                None => &empty,
                Some(JsonValue::Object(entries)) => entries,
                Some(other) => return Err(type_mismatch("object", other).at_field(name)),
            };
            let value_ty = ctx.resolve_type(value_type_name).map_err(at_field(name))?;
            let values = entries
                .iter()
                .map(|(key, item)| {
                    let value = build_value_at(&value_ty, Some(item), ctx, depth)
                        .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
                    Ok((key.clone(), value))
                })
                .collect::<Result<Vec<_>, DeserializeError>>()
                .map_err(at_field(name))?;
            Ok((name.clone(), values))
        })
        .collect::<Result<Vec<_>, DeserializeError>>()?;

    Ok(MessageValue {
        ty: Arc::clone(ty),
        single_fields,
        repeated_fields,
        one_of_fields,
        map_fields,
    })
}

fn build_value_impl(
    ty: &ProtobufType,
    input: Option<&JsonValue>,
    ctx: &ProtoCtx,
    depth: usize,
) -> Result<ProtobufValue, DeserializeError> {
    match ty {
        ProtobufType::Message(message_ty) => {
            let empty = Map::new();
            let object = match input {
                None => &empty,
                Some(JsonValue::Object(object)) => object,
                Some(other) => return Err(type_mismatch("object", other)),
            };
            build_message_at(message_ty, object, ctx, depth).map(ProtobufValue::Message)
        }
        ProtobufType::Primitive(primitive_ty) => {
            build_primitive(primitive_ty, input).map(ProtobufValue::Primitive)
        }
        ProtobufType::Enum(enum_ty) => build_enum(enum_ty, input).map(ProtobufValue::Enum),
    }
}

fn build_primitive(
    ty: &Arc<PrimitiveType>,
    input: Option<&JsonValue>,
) -> Result<PrimitiveValue, DeserializeError> {
    let value = match input {
        None => ty.default_value.canonical(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        Some(JsonValue::Number(n)) => canonical_number(n),
        Some(other) => return Err(type_mismatch("string, number or boolean", other)),
    };
    Ok(PrimitiveValue {
        ty: Arc::clone(ty),
        value,
    })
}

fn build_enum(
    ty: &Arc<EnumType>,
    input: Option<&JsonValue>,
) -> Result<EnumValue, DeserializeError> {
    // Numbers match option values, everything else matches option names.
    let selected = match input {
        None => ty.option_by_number(0),
        Some(JsonValue::Number(n)) => integral(n).and_then(|n| ty.option_by_number(n)),
        Some(JsonValue::String(s)) => ty.option_by_name(s),
        Some(_) => None,
    };
    match selected {
        Some(selected) => Ok(EnumValue {
            ty: Arc::clone(ty),
            selected: selected.to_string(),
        }),
        None => Err(DeserializeError::new(
            DeserializeErrorKind::UnknownEnumValue {
                value: describe_enum_input(input),
                enum_name: ty.name.clone(),
            },
        )),
    }
}

fn present(input: Option<&JsonValue>) -> Option<&JsonValue> {
    input.filter(|v| !v.is_null())
}

fn at_field(name: &str) -> impl FnOnce(DeserializeError) -> DeserializeError + '_ {
    move |e| e.at_field(name)
}

fn type_mismatch(expected: &'static str, actual: &JsonValue) -> DeserializeError {
    DeserializeError::new(DeserializeErrorKind::TypeMismatch {
        expected,
        actual: json_kind(actual),
    })
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn canonical_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map(canonical_f64).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

fn integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn describe_enum_input(input: Option<&JsonValue>) -> String {
    match input {
        None => "0".to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => canonical_number(n),
        Some(other) => other.to_string(),
    }
}
