use serde_json::json;

use sheet_query::ingestion::{ingest_from_path, IngestionOptions};
use sheet_query::query::{detector_order, interpret, InterpreterOptions, ResultKind};
use sheet_query::types::{DataSet, Value};

fn students() -> DataSet {
    ingest_from_path("tests/fixtures/students.csv", &IngestionOptions::default()).unwrap()
}

fn ask(ds: &mut DataSet, q: &str) -> sheet_query::query::QueryResponse {
    interpret(ds, q, &InterpreterOptions::default()).unwrap()
}

#[test]
fn conditional_filter_over_uploaded_csv() {
    let mut ds = students();
    let resp = ask(&mut ds, "Give me fullName where codolio greater than than 800");

    assert_eq!(resp.kind, ResultKind::ConditionalFilter);
    assert_eq!(resp.count, Some(3));
    assert_eq!(
        resp.values,
        vec![
            Value::Utf8("Asha Rao".to_string()),
            Value::Utf8("Chitra Iyer".to_string()),
            Value::Utf8("Dev Patel".to_string()),
        ]
    );
    assert_eq!(resp.details.len(), 3);
}

#[test]
fn response_serializes_with_type_field() {
    let mut ds = students();
    let resp = ask(&mut ds, "how many rows");
    assert_eq!(
        resp.to_json(),
        json!({
            "query": "how many rows",
            "answer": "The dataset has 5 rows.",
            "type": "count",
            "count": 5,
        })
    );
}

#[test]
fn max_lists_all_tied_students() {
    let mut ds = students();
    let resp = ask(&mut ds, "who has the highest codolio?");
    assert_eq!(resp.kind, ResultKind::Max);
    assert_eq!(resp.value, Some(900.0));
    assert_eq!(
        resp.values,
        vec![
            Value::Utf8("Asha Rao".to_string()),
            Value::Utf8("Dev Patel".to_string()),
        ]
    );

    let json = resp.to_json();
    assert_eq!(json["details"][1]["fullName"], json!("Dev Patel"));
    assert_eq!(json["details"][1]["city"], json!("Delhi"));
}

#[test]
fn average_skips_missing_values() {
    let mut ds = students();
    let resp = ask(&mut ds, "average attendance");
    assert_eq!(resp.kind, ResultKind::Average);
    assert_eq!(resp.column.as_deref(), Some("attendance"));
    let mean = resp.value.unwrap();
    assert!((mean - 0.88).abs() < 1e-9);
}

#[test]
fn prefix_filter_uses_name_column() {
    let mut ds = students();
    let resp = ask(&mut ds, "show names starting with A");
    assert_eq!(resp.kind, ResultKind::Filter);
    assert_eq!(resp.column.as_deref(), Some("fullName"));
    assert_eq!(resp.count, Some(2));
}

#[test]
fn count_of_city() {
    let mut ds = students();
    let resp = ask(&mut ds, "how many students are from pune");
    assert_eq!(resp.kind, ResultKind::Count);
    assert_eq!(resp.count, Some(2));
    assert_eq!(resp.column.as_deref(), Some("city"));
}

#[test]
fn help_lists_columns_and_detector_order_is_stable() {
    let mut ds = students();
    let resp = ask(&mut ds, "what is the weather");
    assert_eq!(resp.kind, ResultKind::Help);
    for name in ["fullName", "codolio", "city", "attendance"] {
        assert!(resp.answer.contains(name), "{name}");
    }
    assert_eq!(detector_order().first(), Some(&"row_count"));
    assert_eq!(detector_order().last(), Some(&"help"));
}

#[test]
fn preview_caps_are_configurable() {
    let mut ds = students();
    let opts = InterpreterOptions {
        max_preview_rows: 1,
        max_preview_values: 2,
        ..Default::default()
    };
    let resp = interpret(&mut ds, "show fullName where codolio > 600", &opts).unwrap();
    assert_eq!(resp.count, Some(5));
    assert_eq!(resp.details.len(), 1);
    assert_eq!(resp.values.len(), 2);
    assert!(resp.answer.ends_with(", ..."));
}
