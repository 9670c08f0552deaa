
use protolens_core::{
    ConverterRule, ConverterSet, DESERIALIZE_ERROR_PREFIX, DecodeResult, DecoderError,
    WireDecoder, deserialize,
};
use serde_json::{Value as JsonValue, json};
use test_helpers::*;

/// Decoder that "decodes" bytes as UTF-8 JSON text.
struct JsonTextDecoder;

impl WireDecoder for JsonTextDecoder {
    fn decode_json(
        &self,
        message_name: &str,
        message_data: &[u8],
    ) -> Result<JsonValue, DecoderError> {
        if message_name == "test.Unknown" {
            return Err(DecoderError::MessageNotFound {
                message_name: message_name.to_string(),
            });
        }
        serde_json::from_slice(message_data).map_err(|e| DecoderError::MessageDecode {
            message_name: message_name.to_string(),
            source: Box::new(e),
        })
    }

    fn describe_error(&self, error: &DecoderError) -> String {
        match error {
            DecoderError::MessageNotFound { message_name } => {
                format!("no such message: {message_name}")
            }
            other => format!("bad payload ({other})"),
        }
    }
}

#[test]
fn valid_payload_yields_typed_tree() {
    let ctx = ctx();
    let result = deserialize(
        &JsonTextDecoder,
        br#"{ "name": "n", "tags": ["a"] }"#,
        "test.Outer",
        &ctx,
    );

    assert!(result.is_valid());
    let value = result.value().unwrap();
    assert_eq!(value.ty.name, "test.Outer");
    assert_eq!(value.repeated("tags").unwrap().len(), 1);
    assert_eq!(result.error(), None);
    assert_eq!(result.raw(), None);
}

#[test]
fn malformed_bytes_yield_invalid_without_raw() {
    let ctx = ctx();
    let result = deserialize(&JsonTextDecoder, b"\xff\x00", "test.Outer", &ctx);

    let DecodeResult::Invalid { raw, error } = result else {
        panic!("expected Invalid");
    };
    assert_eq!(raw, None);
    assert!(error.starts_with("bad payload"), "{error}");
}

#[test]
fn unknown_message_yields_invalid_without_raw() {
    let ctx = ctx();
    let result = deserialize(&JsonTextDecoder, b"{}", "test.Unknown", &ctx);

    assert_eq!(
        result,
        DecodeResult::Invalid {
            raw: None,
            error: "no such message: test.Unknown".to_string(),
        }
    );
}

#[test]
fn typed_build_failure_keeps_pretty_raw_value() {
    let ctx = ctx();
    let result = deserialize(&JsonTextDecoder, br#"{"other":1}"#, "test.Choice", &ctx);

    let DecodeResult::Invalid { raw, error } = result else {
        panic!("expected Invalid");
    };
    let raw = raw.expect("raw value should be preserved");
    assert_eq!(raw, serde_json::to_string_pretty(&json!({ "other": 1 })).unwrap());
    assert_eq!(
        error,
        format!(
            "{DESERIALIZE_ERROR_PREFIX}The given json couldn't find any field for the 'oneof' field 'kind'."
        )
    );
}

#[test]
fn nested_failure_reports_path() {
    let ctx = ctx();
    let result = deserialize(
        &JsonTextDecoder,
        br#"{ "children": [{}, { "label": ["x"] }] }"#,
        "test.Outer",
        &ctx,
    );

    let error = result.error().unwrap();
    assert!(error.starts_with(DESERIALIZE_ERROR_PREFIX), "{error}");
    assert!(error.contains("at 'children[1].label'"), "{error}");
    assert!(result.raw().unwrap().contains("\"label\""));
}

#[test]
fn root_must_be_a_registered_message() {
    let ctx = ctx();

    let result = deserialize(&JsonTextDecoder, b"{}", "test.Color", &ctx);
    assert!(result.error().unwrap().contains("Expected 'message', but got 'enum'"));

    let result = deserialize(&JsonTextDecoder, b"{}", "test.NotRegistered", &ctx);
    assert!(result.raw().is_some());
    assert!(result.error().unwrap().contains("test.NotRegistered"));
}

#[test]
fn non_object_root_is_a_type_mismatch() {
    let ctx = ctx();
    let result = deserialize(&JsonTextDecoder, b"[1, 2]", "test.Outer", &ctx);

    assert!(result.error().unwrap().ends_with("Expected 'object', but got 'array'"));
    assert!(result.raw().is_some());
}

#[test]
fn root_message_is_not_converted() {
    let ctx = ctx().with_converters(ConverterSet::new().with(
        "test.Inner",
        ConverterRule::Constant {
            value: "converted".to_string(),
        },
    ));
    let result = deserialize(&JsonTextDecoder, br#"{ "x": 1 }"#, "test.Inner", &ctx);

    let value = result.into_value().unwrap();
    assert_eq!(value.ty.name, "test.Inner");
    assert_eq!(value.single("x").unwrap().as_primitive().unwrap().value, "1");
}

#[test]
fn runaway_recursion_is_a_typed_build_failure() {
    let ctx = ctx();
    let result = deserialize(&JsonTextDecoder, br#"{ "value": 1 }"#, "test.List", &ctx);

    let DecodeResult::Invalid { raw, error } = result else {
        panic!("expected Invalid");
    };
    assert!(raw.is_some());
    assert!(error.starts_with(DESERIALIZE_ERROR_PREFIX));
    assert!(error.ends_with("The message 'test.List' is nested more than 100 levels deep"));
}
