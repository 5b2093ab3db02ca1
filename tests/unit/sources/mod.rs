use super::*;
use serde_json::json;

#[test]
fn inline_source_wraps_scalars() {
    let spec: DataSpec = serde_json::from_value(json!({"values": [{"a": 1}, 7]})).unwrap();
    let mut s = create_data_source(&spec, Path::new(".")).unwrap();
    let rows = s.load().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["a"], json!(1));
    assert_eq!(rows[1]["data"], json!(7));
    assert_eq!(s.kind(), "inline");
}

#[test]
fn sequence_source_generates_half_open_range() {
    let spec: DataSpec =
        serde_json::from_value(json!({"sequence": {"start": 0, "stop": 5, "step": 2, "as": "i"}}))
            .unwrap();
    let mut s = create_data_source(&spec, Path::new(".")).unwrap();
    let values: Vec<f64> = s
        .load()
        .unwrap()
        .iter()
        .map(|r| r["i"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![0.0, 2.0, 4.0]);
}

#[test]
fn zero_step_sequence_is_a_config_error() {
    let spec: DataSpec =
        serde_json::from_value(json!({"sequence": {"start": 0, "stop": 5, "step": 0}})).unwrap();
    let err = create_data_source(&spec, Path::new(".")).unwrap_err();
    match err {
        GentrackError::Config { config, .. } => assert_eq!(config["sequence"]["step"], json!(0.0)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn url_source_reads_json_and_ndjson() {
    let dir = std::path::PathBuf::from("target").join("unit_url_source");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("rows.json"), r#"[{"x": 1}, {"x": 2}]"#).unwrap();
    std::fs::write(dir.join("rows.ndjson"), "{\"x\": 3}\n\n{\"x\": 4}\n").unwrap();

    let json_spec = DataSpec::Url {
        url: "rows.json".to_string(),
        format: None,
    };
    let nd_spec = DataSpec::Url {
        url: "rows.ndjson".to_string(),
        format: None,
    };
    let a = create_data_source(&json_spec, &dir).unwrap().load().unwrap();
    let b = create_data_source(&nd_spec, &dir).unwrap().load().unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b[1]["x"], json!(4));
}

#[test]
fn missing_file_surfaces_io_error() {
    let spec = DataSpec::Url {
        url: "does-not-exist.json".to_string(),
        format: None,
    };
    let err = create_data_source(&spec, Path::new("target"))
        .unwrap()
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn oversized_sequence_is_rejected_before_loading() {
    let spec: DataSpec =
        serde_json::from_value(json!({"sequence": {"start": 0, "stop": 1e300}})).unwrap();
    let err = create_data_source(&spec, Path::new(".")).unwrap_err();
    match err {
        GentrackError::Config { message, config } => {
            assert!(message.contains("rows"));
            assert_eq!(config["sequence"]["stop"], json!(1e300));
        }
        other => panic!("unexpected error: {other}"),
    }

    let at_limit = SequenceSource::new(SequenceParams {
        start: 0.0,
        stop: MAX_SEQUENCE_LEN as f64,
        step: 1.0,
        as_field: "data".to_string(),
    })
    .unwrap();
    assert_eq!(at_limit.len(), MAX_SEQUENCE_LEN);
}

#[test]
fn descending_range_with_positive_step_is_empty() {
    let spec: DataSpec =
        serde_json::from_value(json!({"sequence": {"start": 5, "stop": 0}})).unwrap();
    let rows = create_data_source(&spec, Path::new("."))
        .unwrap()
        .load()
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn unsupported_extension_is_a_config_error() {
    let spec = DataSpec::Url {
        url: "rows.csv".to_string(),
        format: None,
    };
    match create_data_source(&spec, Path::new(".")).unwrap_err() {
        GentrackError::Config { message, config } => {
            assert!(message.contains(".csv"));
            assert_eq!(config["url"], json!("rows.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let explicit = DataSpec::Url {
        url: "rows.tsv".to_string(),
        format: Some(DataFormat::Ndjson),
    };
    assert!(create_data_source(&explicit, Path::new(".")).is_ok());
}
