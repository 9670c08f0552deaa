//! Schema model, typed value tree and value builder for protolens.
//!
//! This crate turns the generic JSON-like value produced by a wire decoder
//! into a typed [`ProtobufValue`] tree, driven by a name-keyed
//! [`SchemaRegistry`]. The wire decoder itself is abstracted behind the
//! [`WireDecoder`] trait; [`deserialize`] ties both layers together and
//! reports failures as a two-tier [`DecodeResult`].

mod builder;
mod context;
mod converter;
mod decoder;
mod error;
mod resolver;
mod result;
mod schema;
mod value;

pub use builder::{RECURSION_LIMIT, build_message, build_value};
pub use context::ProtoCtx;
pub use converter::{
    ConverterConfig, ConverterEntry, ConverterRule, ConverterSet, ValueConverter,
};
pub use decoder::WireDecoder;
pub use error::{ConversionError, DecoderError, DeserializeError, DeserializeErrorKind, PathSegment};
pub use resolver::{builtin_type, resolve};
pub use result::{DESERIALIZE_ERROR_PREFIX, DecodeResult, deserialize};
pub use schema::{
    DefaultValue, EnumType, MessageType, PrimitiveType, ProtobufType, SchemaRegistry,
    normalize_type_name,
};
pub use value::{
    EnumValue, MessageValue, PrimitiveValue, ProtobufValue, format_value, to_json,
};
