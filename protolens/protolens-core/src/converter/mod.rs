//! Custom conversion hook applied to built values, keyed by type name.

mod rules;

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use tracing::{trace, warn};

use crate::{
    error::{ConversionError, DeserializeError, DeserializeErrorKind},
    schema::normalize_type_name,
    value::ProtobufValue,
};

pub use rules::{ConverterConfig, ConverterEntry, ConverterRule};

/// Post-processing step that replaces a built value of a given type.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, value: ProtobufValue) -> Result<ProtobufValue, ConversionError>;
}

impl<F> ValueConverter for F
where
    F: Fn(ProtobufValue) -> Result<ProtobufValue, ConversionError> + Send + Sync,
{
    fn convert(&self, value: ProtobufValue) -> Result<ProtobufValue, ConversionError> {
        self(value)
    }
}

/// Ordered list of `(type name, converter)` entries.
///
/// Only the first entry whose type name matches is applied; later entries for
/// the same name are never consulted.
#[derive(Clone, Default)]
pub struct ConverterSet {
    entries: Vec<(String, Arc<dyn ValueConverter>)>,
}

impl ConverterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a converter for `type_name`.
    pub fn register(
        &mut self,
        type_name: impl AsRef<str>,
        converter: impl ValueConverter + 'static,
    ) {
        self.register_shared(type_name, Arc::new(converter));
    }

    pub fn register_shared(&mut self, type_name: impl AsRef<str>, converter: Arc<dyn ValueConverter>) {
        let type_name = normalize_type_name(type_name.as_ref()).to_string();
        self.entries.push((type_name, converter));
    }

    pub fn with(
        mut self,
        type_name: impl AsRef<str>,
        converter: impl ValueConverter + 'static,
    ) -> Self {
        self.register(type_name, converter);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Apply the first converter registered for the value's type name.
    ///
    /// Values without a matching entry are returned unchanged. A converter
    /// that fails or panics is reported as
    /// [`DeserializeErrorKind::ConversionHookFailure`].
    pub fn apply(&self, value: ProtobufValue) -> Result<ProtobufValue, DeserializeError> {
        let Some((type_name, converter)) = self
            .entries
            .iter()
            .find(|(name, _)| name == value.type_name())
        else {
            return Ok(value);
        };

        trace!(type_name = %type_name, "applying custom converter");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(value)));
        let source = match outcome {
            Ok(Ok(converted)) => return Ok(converted),
            Ok(Err(e)) => e,
            Err(payload) => ConversionError(format!(
                "converter panicked: {}",
                panic_message(payload.as_ref())
            )),
        };

        warn!(type_name = %type_name, error = %source, "custom converter failed");
        Err(DeserializeError::new(
            DeserializeErrorKind::ConversionHookFailure {
                type_name: type_name.clone(),
                source,
            },
        ))
    }
}

impl fmt::Debug for ConverterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}

impl From<ConverterConfig> for ConverterSet {
    fn from(config: ConverterConfig) -> Self {
        let mut set = ConverterSet::new();
        for entry in config.converters {
            set.register(entry.type_name, entry.rule);
        }
        set
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
