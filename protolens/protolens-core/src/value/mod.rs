//! Typed value tree produced by the value builder.

mod format;
mod json;
mod types;

pub use format::format_value;
pub use json::to_json;
pub use types::{EnumValue, MessageValue, PrimitiveValue, ProtobufValue};
