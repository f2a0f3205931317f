//! CLI integration tests
//!
//! Run the built `folio` binary against a scratch database and check that
//! each subcommand reaches the engine and prints JSON.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("nested").join("folio.db")
}

fn folio(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_folio"))
        .env_remove("FOLIO_LOG_PROFILE")
        .env_remove("FOLIO_AUTHOR")
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn folio_ok(db: &Path, args: &[&str]) -> String {
    let output = folio(db, args);
    assert!(
        output.status.success(),
        "folio {:?} failed. Stderr: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn folio_json(db: &Path, args: &[&str]) -> Value {
    serde_json::from_str(&folio_ok(db, args)).expect("stdout should be JSON")
}

fn put_article(db: &Path, title: &str) {
    let record = serde_json::json!({
        "kind": "insight",
        "id": 1,
        "title": title,
        "slug": "hello",
        "excerpt": null,
        "content": "Body",
        "featured_image": null,
        "category": null,
        "tags": ["news"],
        "meta_title": null,
        "meta_description": null
    });
    folio_ok(db, &["content", "put", "--json", &record.to_string()]);
}

#[test]
fn test_save_restore_publish_flow() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    put_article(&db, "Draft");
    let v1 = folio_json(
        &db,
        &["versions", "save", "insight:1", "--summary", "first", "--author", "ana"],
    );
    assert_eq!(v1["version_number"], 1);
    assert_eq!(v1["is_current"], true);

    put_article(&db, "Final");
    folio_ok(&db, &["versions", "save", "insight:1", "--summary", "second"]);

    let v3 = folio_json(
        &db,
        &["versions", "restore", "insight:1", "1", "--notes", "rollback"],
    );
    assert_eq!(v3["version_number"], 3);
    assert_eq!(v3["change_summary"], "Restored to version 1");
    assert_eq!(v3["payload"]["title"], "Draft");

    let live = folio_json(&db, &["content", "get", "insight:1"]);
    assert_eq!(live["title"], "Draft");

    let published = folio_json(&db, &["versions", "publish", "insight:1", "2"]);
    assert_eq!(published["is_published"], true);

    let page = folio_json(&db, &["versions", "list", "insight:1"]);
    assert_eq!(page["total"], 3);
    assert_eq!(page["versions"][0]["version_number"], 3);

    let shown = folio_json(&db, &["versions", "show", "insight:1", "2"]);
    assert_eq!(shown["payload"]["title"], "Final");

    let unpublished = folio_json(&db, &["versions", "unpublish", "insight:1"]);
    assert_eq!(unpublished["unpublished"]["version_number"], 2);
}

#[test]
fn test_compare_prints_summary_or_json() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    put_article(&db, "Draft");
    folio_ok(&db, &["versions", "save", "insight:1", "--summary", "v1"]);
    put_article(&db, "Final");
    folio_ok(&db, &["versions", "save", "insight:1", "--summary", "v2"]);

    let summary = folio_ok(&db, &["versions", "compare", "insight:1", "1", "2"]);
    assert!(summary.contains("**title** modified: `Draft` → `Final`"));

    let structured = folio_json(&db, &["versions", "compare", "insight:1", "1", "2", "--json"]);
    assert_eq!(structured["differences"][0]["field"], "title");
    assert_eq!(structured["differences"][0]["kind"], "modified");
}

#[test]
fn test_draft_on_service_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let record = serde_json::json!({
        "kind": "service",
        "id": 2,
        "title": "Audits",
        "slug": "audits",
        "summary": null,
        "description": "We audit",
        "features": [],
        "icon": null,
        "sort_order": 1
    });
    folio_ok(&db, &["content", "put", "--json", &record.to_string()]);

    let output = folio(
        &db,
        &["versions", "draft", "service:2", "--payload", r#"{"title":"New"}"#],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_UNSUPPORTED_OPERATION"));
}

#[test]
fn test_missing_version_reports_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    put_article(&db, "Only");

    let output = folio(&db, &["versions", "publish", "insight:1", "9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_bad_entity_reference_is_a_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = folio(&db, &["versions", "list", "widget:1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown content kind"));
}
