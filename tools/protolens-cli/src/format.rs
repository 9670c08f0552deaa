use anyhow::Result;
use clap::ValueEnum;
use protolens::core::{MessageValue, ProtobufValue, format_value, to_json};

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Indented tree
    Text,
    /// Pretty-printed JSON in the generic form
    Json,
}

impl OutputFormat {
    pub fn render(&self, value: MessageValue) -> Result<String> {
        let value = ProtobufValue::Message(value);
        match self {
            OutputFormat::Text => Ok(format_value(&value)?.trim_end().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&to_json(&value))?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use protolens::core::MessageType;

    use super::*;

    fn empty_message() -> MessageValue {
        MessageValue {
            ty: Arc::new(MessageType::new("demo.Empty")),
            single_fields: vec![],
            repeated_fields: vec![],
            one_of_fields: vec![],
            map_fields: vec![],
        }
    }

    #[test]
    fn renders_text_and_json() {
        assert_eq!(OutputFormat::Text.render(empty_message()).unwrap(), "demo.Empty");
        assert_eq!(OutputFormat::Json.render(empty_message()).unwrap(), "{}");
    }
}
