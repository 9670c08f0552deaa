//! Error types for the inspector.

use protolens_core::DecoderError;

/// Errors produced while assembling an [`Inspector`](crate::Inspector).
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    /// I/O error while reading a descriptor set or converter file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor data could not be loaded into a schema.
    #[error(transparent)]
    Decoder(#[from] DecoderError),

    /// A converter configuration file is not valid JSON or names an unknown rule.
    #[error("invalid converter configuration: {0}")]
    ConverterConfig(#[from] serde_json::Error),

    /// [`InspectorBuilder::build`](crate::InspectorBuilder::build) was called
    /// before any descriptor set was supplied.
    #[error("no descriptor set was supplied")]
    MissingSchema,
}
