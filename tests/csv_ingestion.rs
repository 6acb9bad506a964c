use sheet_query::ingestion::csv::{
    ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_inferred_from_path, ingest_csv_inferred_from_reader,
};
use sheet_query::types::{DataType, Field, Schema, Value};

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let schema = people_schema();
    let ds = ingest_csv_from_path("tests/fixtures/people.csv", &schema).unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let schema = people_schema();
    let mut rdr = reader("name,id,active,score\nAda,1,true,98.5\n");

    let ds = ingest_csv_from_reader(&mut rdr, &schema).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0][0], Value::Int64(1));
    assert_eq!(ds.rows[0][1], Value::Utf8("Ada".to_string()));
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let schema = people_schema();
    let mut rdr = reader("id,name,score\n1,Ada,98.5\n");

    let err = ingest_csv_from_reader(&mut rdr, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'active'"));
}

#[test]
fn ingest_csv_errors_on_type_parse() {
    let schema = people_schema();
    let mut rdr = reader("id,name,score,active\nnot_an_int,Ada,98.5,true\n");

    let err = ingest_csv_from_reader(&mut rdr, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'id'"));
}

#[test]
fn inferred_ingestion_types_each_column() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/people.csv").unwrap();

    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![DataType::Int64, DataType::Utf8, DataType::Float64, DataType::Bool]
    );
    assert_eq!(ds.rows[1][1], Value::Utf8("Grace".to_string()));
    assert_eq!(ds.rows[1][3], Value::Bool(false));
}

#[test]
fn inferred_ingestion_treats_placeholders_as_null() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/students.csv").unwrap();

    assert_eq!(ds.column_names(), vec!["fullName", "codolio", "city", "attendance"]);
    assert_eq!(ds.schema.fields[1].data_type, DataType::Int64);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Float64);
    assert_eq!(ds.rows[2][3], Value::Null);
}

#[test]
fn inferred_ingestion_pads_short_rows_and_names_blank_headers() {
    let mut rdr = reader("name,,amount\nAda,x,1\nGrace\n");
    let ds = ingest_csv_inferred_from_reader(&mut rdr).unwrap();

    assert_eq!(ds.column_names(), vec!["name", "column_2", "amount"]);
    assert_eq!(ds.rows[1], vec![Value::Utf8("Grace".to_string()), Value::Null, Value::Null]);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Int64);
}

#[test]
fn inferred_ingestion_rejects_empty_input() {
    let mut rdr = reader("");
    let err = ingest_csv_inferred_from_reader(&mut rdr).unwrap_err();
    assert!(err.to_string().contains("schema mismatch"));
}
