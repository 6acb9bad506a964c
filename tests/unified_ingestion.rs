use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sheet_query::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
use sheet_query::types::{DataType, Field, Schema, Value};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheet-query-unified-{nanos}.{ext}"))
}

#[test]
fn csv_extension_is_detected_and_types_inferred() {
    let ds = ingest_from_path("tests/fixtures/people.csv", &IngestionOptions::default()).unwrap();
    assert_eq!(ds.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
    assert_eq!(ds.rows[0][2], Value::Float64(98.5));
}

#[test]
fn explicit_schema_projects_columns() {
    let opts = IngestionOptions {
        schema: Some(Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("id", DataType::Int64),
        ])),
        ..Default::default()
    };
    let ds = ingest_from_path("tests/fixtures/people.csv", &opts).unwrap();
    assert_eq!(ds.column_names(), vec!["name", "id"]);
    assert_eq!(ds.rows[1], vec![Value::Utf8("Grace".to_string()), Value::Int64(2)]);
}

#[test]
fn format_override_reads_files_without_extension() {
    let path = tmp_file("upload");
    std::fs::write(&path, "city,visits\nPune,3\nDelhi,\n").unwrap();

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let ds = ingest_from_path(&path, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[1][1], Value::Null);

    let _ = std::fs::remove_file(&path);
}

#[cfg(not(feature = "excel"))]
#[test]
fn excel_requires_feature() {
    let err = ingest_from_path("tests/fixtures/book.xlsx", &IngestionOptions::default()).unwrap_err();
    assert!(err.to_string().contains("excel ingestion not enabled"));
}
