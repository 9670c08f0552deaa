//! Error types for the decoder and value builder layers.

use std::fmt;

/// Error returned by [`WireDecoder`](crate::WireDecoder) implementations.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// Schema data (e.g., a serialized `FileDescriptorSet`) could not be parsed.
    #[error("failed to parse schema: {source}")]
    SchemaParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema data is structurally invalid (e.g., broken map entries).
    #[error("invalid schema for '{type_name}': {detail}")]
    SchemaInvalid { type_name: String, detail: String },

    /// The requested message type is not part of the schema.
    #[error("message type '{message_name}' not found in schema")]
    MessageNotFound { message_name: String },

    /// Message payload bytes could not be decoded.
    #[error("failed to decode message '{message_name}': {source}")]
    MessageDecode {
        message_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Error raised by a custom converter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl From<String> for ConversionError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ConversionError {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Reason a typed value build was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeserializeErrorKind {
    /// A declared type name is neither a builtin scalar nor registered.
    #[error("The type '{type_name}' isn't defined in the schema")]
    UnknownType { type_name: String },

    /// The generic value has a different shape than the schema expects.
    #[error("Expected '{expected}', but got '{actual}'")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("The given enum value {value} isn't defined in '{enum_name}'")]
    UnknownEnumValue { value: String, enum_name: String },

    #[error("The given json couldn't find any field for the 'oneof' field '{union_name}'.")]
    MissingOneOf { union_name: String },

    /// Messages nest deeper than the builder allows, typically through an
    /// absent self-referential singular field.
    #[error("The message '{type_name}' is nested more than {limit} levels deep")]
    RecursionLimit { type_name: String, limit: usize },

    /// A custom converter returned an error or panicked.
    #[error("The custom converter for '{type_name}' failed: {source}")]
    ConversionHookFailure {
        type_name: String,
        #[source]
        source: ConversionError,
    },
}

/// One step of the path from the root message to a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
    Key(String),
}

/// Error produced by the value builder.
///
/// Carries the failing [`DeserializeErrorKind`] together with the field path
/// at which it occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct DeserializeError {
    kind: DeserializeErrorKind,
    // Innermost segment first; segments are appended while unwinding.
    path: Vec<PathSegment>,
}

impl DeserializeError {
    pub fn new(kind: DeserializeErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub fn kind(&self) -> &DeserializeErrorKind {
        &self.kind
    }

    /// Path segments from the root message down to the failing value.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Render the path in `field.list[2].map["key"]` form.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in self.path() {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
                PathSegment::Key(key) => out.push_str(&format!("[{key:?}]")),
            }
        }
        out
    }

    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub(crate) fn at_field(self, name: &str) -> Self {
        self.at(PathSegment::Field(name.to_string()))
    }
}

impl From<DeserializeErrorKind> for DeserializeError {
    fn from(kind: DeserializeErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at '{}': {}", self.path_string(), self.kind)
        }
    }
}

impl std::error::Error for DeserializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
