
use std::{sync::Arc, thread};

use protolens::{
    Inspector, InspectorError,
    core::{
        ConversionError, ConverterConfig, DecodeResult, DefaultValue, PrimitiveType, PrimitiveValue,
        ProtobufValue,
    },
};
use test_helpers::*;

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("protolens-{}-{name}", std::process::id()))
}

#[test]
fn decodes_payload_into_typed_tree() {
    let inspector = Inspector::builder()
        .with_descriptor_set(&reading_fds())
        .unwrap()
        .build()
        .unwrap();

    let wire = encode_reading("probe-1", 21.5, 1_700_000_000, 0, &[3, 1, 2]);
    let result = inspector.deserialize(&wire, "demo.Reading");

    let value = result.value().expect("valid result");
    assert_eq!(value.single("sensor").unwrap().to_text(), "probe-1");
    assert_eq!(value.single("value").unwrap().to_text(), "21.5");
    assert_eq!(value.single("unit").unwrap().to_text(), "CELSIUS");
    let samples: Vec<String> = value
        .repeated("samples")
        .unwrap()
        .iter()
        .map(ProtobufValue::to_text)
        .collect();
    assert_eq!(samples, vec!["3", "1", "2"]);

    let stamp = value.single("stamp").unwrap().as_message().unwrap();
    assert_eq!(stamp.single("seconds").unwrap().to_text(), "1700000000");
    assert_eq!(stamp.single("nanos").unwrap().to_text(), "0");
}

#[test]
fn descriptor_sets_can_be_added_incrementally() {
    let inspector = Inspector::builder()
        .with_descriptor_set(&timestamp_fds())
        .unwrap()
        .with_descriptor_set(&reading_only_fds())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        inspector.message_names(),
        vec!["demo.Reading", "google.protobuf.Timestamp"]
    );
    let reading = inspector.message_type(".demo.Reading").unwrap();
    assert_eq!(reading.repeated_fields, vec![("samples".to_string(), "int32".to_string())]);
    assert!(inspector.message_type("demo.Unit").is_none());
}

#[test]
fn converter_config_rewrites_nested_timestamps() {
    let config = ConverterConfig::from_json_str(
        r#"{ "converters": [
            { "type_name": "google.protobuf.Timestamp", "rule": { "kind": "timestamp" } }
        ] }"#,
    )
    .unwrap();
    let inspector = Inspector::builder()
        .with_descriptor_set(&reading_fds())
        .unwrap()
        .with_converter_config(config)
        .build()
        .unwrap();

    let wire = encode_reading("probe-1", 1.0, 1_700_000_000, 500_000_000, &[]);
    let result = inspector.deserialize(&wire, "demo.Reading");

    let value = result.value().unwrap();
    assert_eq!(
        value.single("stamp").unwrap().to_text(),
        "2023-11-14T22:13:20.500Z"
    );
}

#[test]
fn closure_converter_is_applied() {
    let inspector = Inspector::builder()
        .with_descriptor_set(&reading_fds())
        .unwrap()
        .with_converter("demo.Unit", |value: ProtobufValue| {
            if value.as_enum().is_none() {
                return Err(ConversionError::from("expected an enum"));
            }
            let ty = PrimitiveType::new("string", DefaultValue::String(String::new()));
            Ok(ProtobufValue::Primitive(PrimitiveValue {
                ty: Arc::new(ty),
                value: value.to_text().to_lowercase(),
            }))
        })
        .build()
        .unwrap();

    let wire = encode_reading("probe-1", 1.0, 0, 0, &[]);
    let result = inspector.deserialize(&wire, "demo.Reading");
    assert_eq!(
        result.value().unwrap().single("unit").unwrap().to_text(),
        "celsius"
    );
}

#[test]
fn failing_converter_makes_the_result_invalid() {
    let inspector = Inspector::builder()
        .with_descriptor_set(&reading_fds())
        .unwrap()
        .with_converter("google.protobuf.Timestamp", |_: ProtobufValue| {
            Err(ConversionError::from("clock is broken"))
        })
        .build()
        .unwrap();

    let wire = encode_reading("probe-1", 1.0, 5, 0, &[]);
    let DecodeResult::Invalid { raw, error } = inspector.deserialize(&wire, "demo.Reading") else {
        panic!("expected Invalid");
    };
    assert!(raw.is_some());
    assert!(error.contains("at 'stamp'"));
    assert!(error.contains("clock is broken"));
}

#[test]
fn unknown_message_is_a_wire_failure() {
    let inspector = Inspector::builder()
        .with_descriptor_set(&reading_fds())
        .unwrap()
        .build()
        .unwrap();

    let result = inspector.deserialize(&[], "demo.Missing");
    assert!(!result.is_valid());
    assert!(result.raw().is_none());
    assert_eq!(
        result.error().unwrap(),
        "The message 'demo.Missing' isn't defined in the schema"
    );
}

#[test]
fn build_without_schema_fails() {
    let err = Inspector::builder().build().err().unwrap();
    assert!(matches!(err, InspectorError::MissingSchema));
}

#[test]
fn invalid_descriptor_set_is_rejected() {
    let err = Inspector::builder()
        .with_descriptor_set(&[0xff, 0xff])
        .err()
        .unwrap();
    assert!(matches!(err, InspectorError::Decoder(_)));
}

#[test]
fn missing_descriptor_file_reports_path() {
    let path = scratch_path("does-not-exist.fds");
    let err = Inspector::builder()
        .with_descriptor_file(&path)
        .err()
        .unwrap();
    match err {
        InspectorError::Io { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn files_are_loaded_from_disk() {
    let schema_path = scratch_path("reading.fds");
    let converter_path = scratch_path("converters.json");
    std::fs::write(&schema_path, reading_fds()).unwrap();
    std::fs::write(
        &converter_path,
        r#"{ "converters": [
            { "type_name": ".google.protobuf.Timestamp", "rule": { "kind": "constant", "value": "redacted" } }
        ] }"#,
    )
    .unwrap();

    let inspector = Inspector::builder()
        .with_descriptor_file(&schema_path)
        .unwrap()
        .with_converter_file(&converter_path)
        .unwrap()
        .build()
        .unwrap();
    std::fs::remove_file(&schema_path).unwrap();
    std::fs::remove_file(&converter_path).unwrap();

    let wire = encode_reading("probe-1", 1.0, 5, 0, &[]);
    let result = inspector.deserialize(&wire, "demo.Reading");
    assert_eq!(
        result.value().unwrap().single("stamp").unwrap().to_text(),
        "redacted"
    );
}

#[test]
fn malformed_converter_file_is_rejected() {
    let path = scratch_path("bad-converters.json");
    std::fs::write(&path, r#"{ "converters": [ { "type_name": "x", "rule": { "kind": "nope" } } ] }"#)
        .unwrap();
    let err = Inspector::builder().with_converter_file(&path).err().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, InspectorError::ConverterConfig(_)));
}

#[test]
fn converter_file_with_invalid_utf8_is_rejected() {
    let path = scratch_path("latin1-converters.json");
    let mut data = br#"{ "converters": [ { "type_name": "caf"#.to_vec();
    data.push(0xe9);
    data.extend_from_slice(br#"", "rule": { "kind": "timestamp" } } ] }"#);
    std::fs::write(&path, data).unwrap();

    let err = Inspector::builder().with_converter_file(&path).err().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, InspectorError::ConverterConfig(_)));
}

#[test]
fn inspector_is_shared_across_threads() {
    let inspector = Arc::new(
        Inspector::builder()
            .with_descriptor_set(&reading_fds())
            .unwrap()
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let inspector = Arc::clone(&inspector);
            thread::spawn(move || {
                let wire = encode_reading(&format!("probe-{i}"), 1.0, 0, 0, &[i]);
                let result = inspector.deserialize(&wire, "demo.Reading");
                result.value().unwrap().single("sensor").unwrap().to_text()
            })
        })
        .collect();

    let mut sensors: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    sensors.sort();
    assert_eq!(sensors, vec!["probe-0", "probe-1", "probe-2", "probe-3"]);
}
