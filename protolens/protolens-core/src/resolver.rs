//! Type-name resolution against builtin scalars and the schema registry.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    context::ProtoCtx,
    error::{DeserializeError, DeserializeErrorKind},
    schema::{DefaultValue, PrimitiveType, ProtobufType, normalize_type_name},
};

const NUMERIC_SCALARS: &[&str] = &[
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64",
];

static BUILTIN_TYPES: LazyLock<HashMap<&'static str, ProtobufType>> = LazyLock::new(|| {
    let mut types = HashMap::new();
    for name in NUMERIC_SCALARS {
        types.insert(
            *name,
            PrimitiveType::new(*name, DefaultValue::Number(0.0)).into(),
        );
    }
    types.insert("bool", PrimitiveType::new("bool", DefaultValue::Bool(false)).into());
    for name in ["string", "bytes"] {
        types.insert(
            name,
            PrimitiveType::new(name, DefaultValue::String(String::new())).into(),
        );
    }
    types
});

/// Return the builtin scalar type called `name`, if any.
pub fn builtin_type(name: &str) -> Option<&'static ProtobufType> {
    BUILTIN_TYPES.get(name)
}

/// Resolve `type_name` to a schema node.
///
/// Builtin scalar names are answered first, then the registry held by `ctx`
/// is consulted. A leading `.` is ignored. Unknown names are reported as
/// [`DeserializeErrorKind::UnknownType`].
pub fn resolve(type_name: &str, ctx: &ProtoCtx) -> Result<ProtobufType, DeserializeError> {
    let name = normalize_type_name(type_name);
    if let Some(ty) = builtin_type(name) {
        return Ok(ty.clone());
    }
    ctx.registry().get(name).cloned().ok_or_else(|| {
        DeserializeError::new(DeserializeErrorKind::UnknownType {
            type_name: name.to_string(),
        })
    })
}
