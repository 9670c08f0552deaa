
use protolens_core::{ProtobufValue, build_message, format_value};
use serde_json::{Value as JsonValue, json};
use test_helpers::*;

fn object(value: JsonValue) -> serde_json::Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn message_is_rendered_in_declaration_order() {
    let ctx = ctx();
    let outer = message_type(&ctx, "test.Outer");
    let input = json!({
        "attrs": { "z": 1, "a": 2 },
        "name": "n",
        "color": "BLUE",
        "children": [{ "x": 1, "label": "c" }],
    });
    let value = build_message(&outer, &object(input), &ctx).unwrap();

    let expected = r#"test.Outer
    name: n
    count: 0
    flag: false
    ratio: 0
    color: BLUE
    inner: test.Inner
        x: 0
        label: 
    tags: []
    children:
        [0]: test.Inner
            x: 1
            label: c
    attrs:
        "z": 1
        "a": 2
"#;
    assert_eq!(format_value(&ProtobufValue::Message(value.clone())).unwrap(), expected);
    assert_eq!(value.to_string(), expected);
}

#[test]
fn one_of_and_empty_message_rendering() {
    let ctx = ctx();
    let choice = message_type(&ctx, "test.Choice");
    let value = build_message(&choice, &object(json!({ "bar": "b" })), &ctx).unwrap();

    assert_eq!(value.to_string(), "test.Choice\n    bar (oneof kind): b\n");

    let empty = ProtobufValue::Message(
        build_message(
            &std::sync::Arc::new(protolens_core::MessageType::new("test.Empty")),
            &serde_json::Map::new(),
            &ctx,
        )
        .unwrap(),
    );
    assert_eq!(format_value(&empty).unwrap(), "test.Empty\n");
}
