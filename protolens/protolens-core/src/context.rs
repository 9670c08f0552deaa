//! Conversion context shared by every recursive build call.

use std::sync::Arc;

use crate::{
    converter::ConverterSet, error::DeserializeError, resolver, schema::ProtobufType,
    schema::SchemaRegistry,
};

/// Schema registry plus the custom converters to apply while building.
///
/// Cloning is cheap: the registry is shared, never copied.
#[derive(Debug, Clone, Default)]
pub struct ProtoCtx {
    registry: Arc<SchemaRegistry>,
    converters: ConverterSet,
}

impl ProtoCtx {
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            converters: ConverterSet::new(),
        }
    }

    pub fn with_converters(mut self, converters: ConverterSet) -> Self {
        self.converters = converters;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<SchemaRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn converters(&self) -> &ConverterSet {
        &self.converters
    }

    /// Resolve a declared type name to its schema node.
    pub fn resolve_type(&self, type_name: &str) -> Result<ProtobufType, DeserializeError> {
        resolver::resolve(type_name, self)
    }
}
