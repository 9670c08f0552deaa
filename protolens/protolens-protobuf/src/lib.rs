//! Protobuf [`WireDecoder`] implementation for protolens.
//!
//! This crate provides [`ProtobufDecoder`], which decodes protobuf-encoded
//! payloads into the generic JSON form consumed by the protolens-core value
//! builder, and [`load_registry`], which turns a serialized
//! `FileDescriptorSet` into a [`SchemaRegistry`].

mod decode;
mod diagnostics;
mod schema;

pub use decode::{ProtobufDecoder, decode_protobuf_to_json, message_to_json};
pub use diagnostics::normalize_error;
pub use protolens_core::{SchemaRegistry, WireDecoder};
pub use schema::{load_registry, parse_descriptor_pool, registry_from_pool};
