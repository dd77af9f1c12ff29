//! CLI integration tests for the store-backed subcommands.
//!
//! The summarize path needs a live provider and is covered by the
//! env-gated tests in `e2e.rs`; everything here runs offline against a
//! seeded temp database.

use assert_cmd::Command;
use pdfdigest::{NewSummary, Store};
use predicates::prelude::*;
use tempfile::TempDir;

const SUMMARY: &str = "# Quick Overview\n💡 First point\n💻 Second point\n# Pro Tips\n🌟 One tip\n# Bottom Line\n💫 The wrap-up\n";

/// Seed a store with one summary and return (dir, id).
fn seeded_store() -> (TempDir, i64) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("digests.db")).unwrap();
    let id = store
        .save_summary(&NewSummary {
            user_id: "jo",
            title: "Launch Plan",
            summary_text: SUMMARY,
            file_name: "launch-plan.pdf",
            file_url: None,
            word_count: 12,
        })
        .unwrap();
    (dir, id)
}

fn cli() -> Command {
    Command::cargo_bin("pdfdigest").unwrap()
}

#[test]
fn list_shows_seeded_summary() {
    let (dir, _id) = seeded_store();
    cli()
        .args(["list", "--user", "jo"])
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Launch Plan"));
}

#[test]
fn list_other_user_is_empty() {
    let (dir, _id) = seeded_store();
    cli()
        .args(["list", "--user", "sam"])
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No summaries stored"));
}

#[test]
fn show_prints_whole_summary() {
    let (dir, id) = seeded_store();
    cli()
        .arg("show")
        .arg(id.to_string())
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick Overview"))
        .stdout(predicate::str::contains("💫 The wrap-up"));
}

#[test]
fn show_toc_lists_all_titles() {
    let (dir, id) = seeded_store();
    cli()
        .arg("show")
        .arg(id.to_string())
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .arg("--toc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick Overview"))
        .stdout(predicate::str::contains("Pro Tips"))
        .stdout(predicate::str::contains("Bottom Line"));
}

#[test]
fn show_section_clamps_out_of_range_index() {
    let (dir, id) = seeded_store();
    // Index 99 clamps to the last section.
    cli()
        .arg("show")
        .arg(id.to_string())
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .args(["--section", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bottom Line"))
        .stdout(predicate::str::contains("3/3"));
}

#[test]
fn show_toc_json_exposes_the_view_contract() {
    let (dir, id) = seeded_store();
    let output = cli()
        .arg("show")
        .arg(id.to_string())
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .args(["--toc", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["section_count"], 3);
    assert_eq!(view["current_index"], 0);
    assert_eq!(view["is_first"], true);
    assert_eq!(view["section_titles"].as_array().unwrap().len(), 3);
}

#[test]
fn show_unknown_id_fails() {
    let (dir, _id) = seeded_store();
    cli()
        .arg("show")
        .arg("4242")
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("4242"));
}

#[test]
fn delete_respects_ownership() {
    let (dir, id) = seeded_store();
    let db = dir.path().join("digests.db");

    cli()
        .arg("delete")
        .arg(id.to_string())
        .arg("--db")
        .arg(&db)
        .args(["--user", "sam"])
        .assert()
        .failure();

    cli()
        .arg("delete")
        .arg(id.to_string())
        .arg("--db")
        .arg(&db)
        .args(["--user", "jo"])
        .assert()
        .success();

    let store = Store::open(&db).unwrap();
    assert!(store.get_summary(id).unwrap().is_none());
}

#[test]
fn extract_rejects_non_pdf() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("not-a-pdf.txt");
    std::fs::write(&bogus, "plain text").unwrap();

    cli()
        .arg("extract")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid PDF"));
}
