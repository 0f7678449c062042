//! Integration tests for dataset loading.

use test_trend::storage::{JsonlReader, load_dataset};

const SERIES_A: &str = r##"{"name":"Suite.A","color":"#c05020","data":[{"x":1,"y":12.5,"xLabel":"41","success":true},{"x":2,"y":null,"xLabel":"42","success":false}]}"##;
const SERIES_B: &str = r#"{"name":"Suite.B","data":[{"x":1,"y":"Infinity","xLabel":"41"}]}"#;

#[test]
fn test_load_jsonl_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    std::fs::write(&path, format!("{SERIES_A}\n\n{SERIES_B}\n")).unwrap();

    let dataset = load_dataset(&path).expect("failed to load dataset");
    assert_eq!(dataset.len(), 2);

    let a = &dataset.series()[0];
    assert_eq!(a.name, "Suite.A");
    assert_eq!(a.color.as_deref(), Some("#c05020"));
    assert_eq!(a.data[0].y, Some(12.5));
    assert_eq!(a.data[1].y, None);
    assert!(!a.data[1].success);

    let b = &dataset.series()[1];
    assert_eq!(b.data[0].y, Some(f64::INFINITY));
    assert!(b.data[0].success);
}

#[test]
fn test_load_json_array_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, format!("[{SERIES_A},{SERIES_B}]")).unwrap();

    let dataset = load_dataset(&path).expect("failed to load dataset");
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.first().unwrap().name, "Suite.A");
}

#[test]
fn test_reader_and_loader_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    std::fs::write(&path, format!("{SERIES_A}\n{SERIES_B}\n")).unwrap();

    let reader = JsonlReader::new(&path);
    let series = reader.read_all().unwrap();
    let dataset = load_dataset(&path).unwrap();
    assert_eq!(series.as_slice(), dataset.series());
}

#[test]
fn test_duplicate_series_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    std::fs::write(&path, format!("{SERIES_A}\n{SERIES_A}\n")).unwrap();

    let err = load_dataset(&path).unwrap_err();
    assert!(err.to_string().contains("duplicate series name 'Suite.A'"));
}

#[test]
fn test_invalid_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "{\"not\":\"an array\"}").unwrap();

    let err = load_dataset(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse"));
}
