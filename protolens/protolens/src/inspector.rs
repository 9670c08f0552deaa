//! Schema, wire decoder and converters bundled behind one entry point.

use std::{fs, path::Path, sync::Arc};

use prost_reflect::DescriptorPool;
use protolens_core::{
    ConverterConfig, ConverterSet, DecodeResult, DecoderError, MessageType, ProtoCtx,
    ProtobufType, ValueConverter, WireDecoder, deserialize,
};
use protolens_protobuf::{ProtobufDecoder, registry_from_pool};
use tracing::debug;

use crate::error::InspectorError;

/// Decodes protobuf payloads into typed value trees.
///
/// The schema is read-only once built, so an `Inspector` can be shared
/// between threads behind an `Arc`.
pub struct Inspector {
    decoder: Arc<dyn WireDecoder>,
    ctx: ProtoCtx,
}

/// Builder for configuring [`Inspector`].
#[derive(Default)]
pub struct InspectorBuilder {
    pool: Option<DescriptorPool>,
    converters: ConverterSet,
}

impl Inspector {
    /// Create a builder for [`Inspector`].
    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::default()
    }

    /// Assemble an inspector from an arbitrary wire decoder and context.
    pub fn from_parts(decoder: Arc<dyn WireDecoder>, ctx: ProtoCtx) -> Self {
        Self { decoder, ctx }
    }

    /// Decode `message_data` as `message_name`.
    pub fn deserialize(&self, message_data: &[u8], message_name: &str) -> DecodeResult {
        deserialize(self.decoder.as_ref(), message_data, message_name, &self.ctx)
    }

    /// Fully-qualified names of every message in the schema, sorted.
    pub fn message_names(&self) -> Vec<&str> {
        self.ctx.registry().message_names()
    }

    /// Look up a message type by name. A leading `.` is accepted.
    pub fn message_type(&self, message_name: &str) -> Option<Arc<MessageType>> {
        match self.ctx.registry().get(message_name) {
            Some(ProtobufType::Message(ty)) => Some(Arc::clone(ty)),
            _ => None,
        }
    }

    pub fn context(&self) -> &ProtoCtx {
        &self.ctx
    }
}

impl InspectorBuilder {
    /// Add the files of a serialized `google.protobuf.FileDescriptorSet`.
    ///
    /// May be called more than once; later sets may depend on files added
    /// by earlier ones.
    pub fn with_descriptor_set(mut self, schema_data: &[u8]) -> Result<Self, InspectorError> {
        let pool = self.pool.get_or_insert_with(DescriptorPool::new);
        pool.decode_file_descriptor_set(schema_data)
            .map_err(|e| DecoderError::SchemaParse {
                source: Box::new(e),
            })?;
        Ok(self)
    }

    /// Read a serialized `FileDescriptorSet` from `path`.
    pub fn with_descriptor_file(self, path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let data = read_file(path.as_ref())?;
        self.with_descriptor_set(&data)
    }

    /// Use an already-built descriptor pool, replacing any previous one.
    pub fn with_descriptor_pool(mut self, pool: DescriptorPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Register a converter for values of `type_name`.
    pub fn with_converter(
        mut self,
        type_name: impl AsRef<str>,
        converter: impl ValueConverter + 'static,
    ) -> Self {
        self.converters.register(type_name, converter);
        self
    }

    /// Register every rule of a declarative converter configuration.
    pub fn with_converter_config(mut self, config: ConverterConfig) -> Self {
        for entry in config.converters {
            self.converters.register(entry.type_name, entry.rule);
        }
        self
    }

    /// Read a JSON converter configuration from `path`.
    pub fn with_converter_file(self, path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let data = read_file(path.as_ref())?;
        let config = ConverterConfig::from_json_slice(&data)?;
        Ok(self.with_converter_config(config))
    }

    /// Build the inspector.
    pub fn build(self) -> Result<Inspector, InspectorError> {
        let pool = self.pool.ok_or(InspectorError::MissingSchema)?;
        let registry = registry_from_pool(&pool)?;
        debug!(
            types = registry.len(),
            converters = self.converters.len(),
            "inspector ready"
        );
        let ctx = ProtoCtx::new(registry).with_converters(self.converters);
        Ok(Inspector::from_parts(Arc::new(ProtobufDecoder::new(pool)), ctx))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, InspectorError> {
    fs::read(path).map_err(|source| InspectorError::Io {
        path: path.display().to_string(),
        source,
    })
}
