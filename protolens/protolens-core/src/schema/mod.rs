//! Schema model: primitive, enum and message types keyed by name.

mod registry;
mod types;

pub use registry::{SchemaRegistry, normalize_type_name};
pub use types::{DefaultValue, EnumType, MessageType, PrimitiveType, ProtobufType};

pub(crate) use types::canonical_f64;
