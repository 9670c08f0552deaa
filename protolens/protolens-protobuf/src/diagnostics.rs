//! Rewriting of decoder failures into short user-facing messages.

use protolens_core::DecoderError;

const PROST_DECODE_PREFIX: &str = "failed to decode Protobuf message: ";

/// Single-line description of a decoder failure suitable for display.
pub fn normalize_error(error: &DecoderError) -> String {
    match error {
        DecoderError::SchemaParse { source } => {
            format!("The schema could not be loaded: {}", one_line(&source.to_string()))
        }
        DecoderError::SchemaInvalid { type_name, detail } => {
            format!("The schema of '{type_name}' is invalid: {detail}")
        }
        DecoderError::MessageNotFound { message_name } => {
            format!("The message '{message_name}' isn't defined in the schema")
        }
        DecoderError::MessageDecode {
            message_name,
            source,
        } => {
            let text = source.to_string();
            let text = text.strip_prefix(PROST_DECODE_PREFIX).unwrap_or(&text);
            format!(
                "The payload couldn't be decoded as '{message_name}': {}",
                one_line(text)
            )
        }
    }
}

fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_sources_are_flattened() {
        assert_eq!(one_line("a\n  b\n\nc"), "a; b; c");
    }

    #[test]
    fn unknown_message_text() {
        let err = DecoderError::MessageNotFound {
            message_name: "pkg.Missing".to_string(),
        };
        assert_eq!(
            normalize_error(&err),
            "The message 'pkg.Missing' isn't defined in the schema"
        );
    }
}
