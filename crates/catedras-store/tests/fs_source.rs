//! FsReportSource against a temporary report directory.

use std::fs;

use catedras_core::Term;
use catedras_store::{FsReportSource, ReportKey, ReportSource, StorageError};

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[tokio::test]
async fn lists_txt_reports_in_key_order() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "sistemas.txt", "Período lectivo: 2025-1\n");
    write(&dir, "informatica.txt", "Período lectivo: 2025-1\n");
    write(&dir, "notes.md", "not a report");
    fs::create_dir(dir.path().join("archive.txt")).unwrap();

    let source = FsReportSource::new(dir.path());
    let reports = source.list_reports().await.unwrap();

    let keys: Vec<&str> = reports.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["informatica.txt", "sistemas.txt"]);
}

#[tokio::test]
async fn program_defaults_to_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "informatica.txt", "");

    let source = FsReportSource::new(dir.path());
    let reports = source.list_reports().await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].program, "informatica");
    assert_eq!(reports[0].term, None);
}

#[tokio::test]
async fn sidecar_supplies_program_and_term() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "inf.txt", "");
    write(
        &dir,
        "inf.meta.json",
        r#"{ "program": "Ingeniería en Informática", "term": "2025-1" }"#,
    );

    let source = FsReportSource::new(dir.path());
    let reports = source.list_reports().await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].program, "Ingeniería en Informática");
    assert_eq!(reports[0].term, Some(Term::new(2025, 1).unwrap()));
}

#[tokio::test]
async fn sidecar_with_only_term_keeps_stem_program() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "inf.txt", "");
    write(&dir, "inf.meta.json", r#"{ "term": "2024-2" }"#);

    let source = FsReportSource::new(dir.path());
    let reports = source.list_reports().await.unwrap();

    assert_eq!(reports[0].program, "inf");
    assert_eq!(reports[0].term, Some(Term::new(2024, 2).unwrap()));
}

#[tokio::test]
async fn invalid_sidecar_term_fails_only_that_report() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "good.txt", "Período lectivo: 2025-1\n");
    write(&dir, "inf.txt", "Período lectivo: 2025-1\n");
    write(&dir, "inf.meta.json", r#"{ "term": "2025-3" }"#);

    let source = FsReportSource::new(dir.path());
    let reports = source.list_reports().await.unwrap();
    let keys: Vec<&str> = reports.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["good.txt", "inf.txt"]);
    assert_eq!(reports[1].program, "inf");

    let err = source
        .fetch_report(&ReportKey::new("inf.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidMetadata { ref key, .. } if key == "inf.txt"));
    assert!(source.fetch_report(&ReportKey::new("good.txt")).await.is_ok());
}

#[tokio::test]
async fn malformed_sidecar_json_fails_on_fetch() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "inf.txt", "");
    write(&dir, "inf.meta.json", "{ not json");

    let source = FsReportSource::new(dir.path());
    assert_eq!(source.list_reports().await.unwrap().len(), 1);

    let err = source
        .fetch_report(&ReportKey::new("inf.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidMetadata { .. }));
}

#[tokio::test]
async fn fetch_returns_exact_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let body = "Período lectivo: 2025-1\nActividad: ÁLGEBRA II (CB002)\n";
    write(&dir, "inf.txt", body);

    let source = FsReportSource::new(dir.path());
    let bytes = source.fetch_report(&ReportKey::new("inf.txt")).await.unwrap();

    assert_eq!(bytes, body.as_bytes());
}

#[tokio::test]
async fn fetch_missing_report_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = FsReportSource::new(dir.path());

    let err = source
        .fetch_report(&ReportKey::new("missing.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::ReportNotFound { ref key } if key == "missing.txt"));
}

#[tokio::test]
async fn fetch_rejects_paths_outside_root() {
    let dir = tempfile::tempdir().unwrap();
    let source = FsReportSource::new(dir.path());

    let err = source
        .fetch_report(&ReportKey::new("../secret.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::InvalidKey { .. }));
}

#[tokio::test]
async fn missing_root_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FsReportSource::new(dir.path().join("nope"));

    let err = source.list_reports().await.unwrap_err();

    assert!(matches!(err, StorageError::Io(_)));
}
