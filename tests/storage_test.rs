//! Result table loading tests
//!
//! Loading is row-tolerant: only an unopenable file fails the whole table.

use arrow::datatypes::DataType;
use packstat::config::{AnalysisConfig, ColumnNames};
use packstat::storage::{MetricKind, ResultRecord, ResultTable, TableSchema};
use packstat::Error;
use std::fs;

#[test]
fn test_load_epsilon_table_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epsilon_n1024.csv");
    fs::write(
        &path,
        "m,alg,epsilon\n500,NFDH,0.081\n500,FFDH,0.052\n1000,NFDH,0.074\n1000,FFDH,0.049\n",
    )
    .unwrap();

    let table = ResultTable::load(&path, &TableSchema::new(MetricKind::Epsilon)).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.source(), Some(path.as_path()));
    assert_eq!(table.algorithms().unwrap(), vec!["NFDH", "FFDH"]);
    assert_eq!(table.values_for("FFDH").unwrap(), vec![0.052, 0.049]);
}

#[test]
fn test_arrow_batch_layout() {
    let table = ResultTable::from_reader(
        "alg,m,time_sec\nNFDH,500,0.0012\n".as_bytes(),
        &TableSchema::new(MetricKind::RuntimeSeconds),
    )
    .unwrap();
    let schema = table.batch().schema();
    let types: Vec<&DataType> = schema.fields().iter().map(|f| f.data_type()).collect();
    assert_eq!(
        types,
        vec![&DataType::Utf8, &DataType::UInt64, &DataType::UInt64, &DataType::Float64]
    );
    assert_eq!(schema.field(3).name(), "time_sec");
}

#[test]
fn test_noisy_rows_dropped_individually() {
    let text = "alg , m , epsilon , note\n\
                NFDH , 500 , 0.1 , ok\n\
                NFDH , five hundred , 0.1 , bad size\n\
                \n\
                FFDH , 500 , , empty metric\n\
                FFDH , 500 , 0.07\n";
    let table = ResultTable::from_reader(text.as_bytes(), &TableSchema::new(MetricKind::Epsilon)).unwrap();
    assert_eq!(
        table.records().unwrap(),
        vec![
            ResultRecord::new("NFDH", 500, 0.1),
            ResultRecord::new("FFDH", 500, 0.07),
        ]
    );
    assert_eq!(table.dropped_rows(), 2);
}

#[test]
fn test_semicolon_delimited_with_custom_columns() {
    let config = AnalysisConfig::builder()
        .delimiter(';')
        .columns(ColumnNames {
            algorithm: "Algorithm".to_string(),
            input_size: "Tasks".to_string(),
            epsilon: "Eps".to_string(),
            ..ColumnNames::default()
        })
        .build()
        .unwrap();
    let text = "ALGORITHM; TASKS; EPS\nNFDH;100;0.3\n";
    let table = ResultTable::from_reader(text.as_bytes(), &config.schema(MetricKind::Epsilon)).unwrap();
    assert_eq!(table.records().unwrap(), vec![ResultRecord::new("NFDH", 100, 0.3)]);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResultTable::load(dir.path().join("absent.csv"), &TableSchema::new(MetricKind::Epsilon))
        .unwrap_err();
    match err {
        Error::TableUnreadable { path, source } => {
            assert!(path.ends_with("absent.csv"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected TableUnreadable, got {other:?}"),
    }
}

#[test]
fn test_directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResultTable::load(dir.path(), &TableSchema::new(MetricKind::Epsilon)).unwrap_err();
    assert!(matches!(err, Error::TableUnreadable { .. }));
}
