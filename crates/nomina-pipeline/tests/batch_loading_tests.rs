//! Integration tests for batch loading from disk
//!
//! Each test writes its fixtures into a temporary directory and loads them through
//! the concurrent path-based loader.

use nomina_parser::test_utils::CfdiBuilder;
use nomina_pipeline::{BatchLoader, LoadError, Session};
use nomina_query::FilterValue;
use std::path::PathBuf;
use tempfile::TempDir;
use test_case::test_case;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_missing_timbre_leaves_collection_empty() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.xml", &CfdiBuilder::new().without_timbre().build());

    let outcome = BatchLoader::new().load_paths(&[path]).await;
    assert!(outcome.records.is_empty());
    assert!(outcome.failures[0]
        .extract_error()
        .is_some_and(|e| e.is_schema()));

    let mut session = Session::new();
    session.replace_batch(outcome);
    assert!(session.is_empty());
    assert!(session.taxonomy().is_empty());
    assert!(session
        .error()
        .is_some_and(|e| e.ends_with("Some files could not be processed.")));
}

#[tokio::test]
async fn test_valid_receipt_plus_plain_text() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write(&dir, "nomina.xml", &CfdiBuilder::new().build()),
        write(&dir, "readme.txt", "not xml at all"),
    ];

    let outcome = BatchLoader::new().load_paths(&paths).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].file_name(), Some("nomina.xml"));
    let summary = outcome.summary().unwrap();
    assert!(summary.starts_with("error processing readme.txt: the file is not valid XML"));
}

#[tokio::test]
async fn test_unreadable_file_is_an_io_failure() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "ok.xml", &CfdiBuilder::new().build());
    let missing = dir.path().join("missing.xml");

    let outcome = BatchLoader::new().load_paths(&[missing, good]).await;

    assert_eq!(outcome.records.len(), 1);
    assert!(matches!(
        &outcome.failures[0],
        LoadError::Io { file, .. } if file == "missing.xml"
    ));
}

#[tokio::test]
async fn test_deductions_across_documents_share_one_column() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write(
            &dir,
            "a.xml",
            &CfdiBuilder::new()
                .uuid("A")
                .deduction("002", "ISR", 100.0)
                .build(),
        ),
        write(
            &dir,
            "b.xml",
            &CfdiBuilder::new()
                .uuid("B")
                .deduction("002", "ISR", 250.0)
                .build(),
        ),
    ];

    let mut session = Session::new();
    session.replace_batch(BatchLoader::new().load_paths(&paths).await);

    let isr_columns: Vec<_> = session
        .taxonomy()
        .headers()
        .iter()
        .filter(|h| h.contains("ISR"))
        .collect();
    assert_eq!(isr_columns, ["D-002 ISR"]);
    assert_eq!(session.totals().get("D-002 ISR"), Some(350.0));
    assert_eq!(session.error(), None);
}

#[test_case("", 2 ; "empty text is unconstrained")]
#[test_case("xodar", 2 ; "matching text")]
#[test_case("zzz", 0 ; "text without match")]
fn test_text_filter_with_empty_date_selection(needle: &str, expected: usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write(&dir, "a.xml", &CfdiBuilder::new().uuid("A").build()),
        write(&dir, "b.xml", &CfdiBuilder::new().uuid("B").build()),
    ];

    let mut session = Session::new();
    session.replace_batch(runtime.block_on(BatchLoader::new().load_paths(&paths)));

    session.set_filter("Nombre Receptor", FilterValue::Text(needle.to_string()));
    session.set_filter("FechaPago", FilterValue::Choices(Vec::new()));

    assert_eq!(session.view().len(), expected);
}

#[tokio::test]
async fn test_latin1_receipt_is_decoded_lossily() {
    let dir = TempDir::new().unwrap();
    let xml = CfdiBuilder::new()
        .uuid("LATIN1")
        .receiver("MUNO800101AAA", "JOSE MU#OZ")
        .deduction("002", "ISR", 100.0)
        .build();
    let bytes: Vec<u8> = xml
        .bytes()
        .map(|b| if b == b'#' { 0xD1 } else { b })
        .collect();
    let path = dir.path().join("latin1.xml");
    std::fs::write(&path, bytes).unwrap();

    let outcome = BatchLoader::new().load_paths(&[path]).await;

    assert!(!outcome.has_failures(), "{:?}", outcome.failures);
    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.get("UUID").and_then(|v| v.as_text()), Some("LATIN1"));
    let name = record
        .get("Nombre Receptor")
        .and_then(|v| v.as_text())
        .unwrap();
    assert_eq!(name, "JOSE MU\u{FFFD}OZ");
    assert_eq!(record.get("D-002 ISR").and_then(|v| v.as_number()), Some(100.0));
}
