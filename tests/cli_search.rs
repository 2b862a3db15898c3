use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::*;

/// One record whose title contains the keyword, nine that only mention it
/// in subjects or collection.
fn write_index(dir: &Path) -> PathBuf {
    let mut rows = vec![serde_json::json!({
        "id": "rule-benedict",
        "title": "The Rule of Saint Benedict",
        "creators": ["Benedict of Nursia"],
        "subjects": ["Monasticism"],
        "genres": [],
        "collection": "Patristics",
        "year": 540,
        "lang": "la",
        "quality": "A",
        "permalink": "record/rule-benedict/"
    })];
    for i in 0..9 {
        rows.push(serde_json::json!({
            "id": format!("vol-{i}"),
            "title": format!("Annals Volume {i}"),
            "creators": ["Anonymous"],
            "subjects": ["Benedictines", "History"],
            "genres": ["History"],
            "collection": "Benedict Collection",
            "year": 1800 + i,
            "lang": "en",
            "quality": null,
            "permalink": format!("record/vol-{i}/")
        }));
    }
    let path = dir.join("index.json");
    fs::write(&path, serde_json::to_string_pretty(&rows).expect("serialize")).expect("write index");
    path
}

fn search(index: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("waypoint");
    cmd.args(["search", "--index"]).arg(index);
    cmd
}

#[test]
fn title_match_ranks_first() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let index = write_index(temp.path());

    let assert = search(&index).args(["--q", "benedict"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("10 records"));
    let first = lines.next().expect("first result");
    assert!(first.contains("rule-benedict"), "got {first}");
    assert!(first.trim_start().starts_with("0.05"), "got {first}");
}

#[test]
fn subject_filters_intersect() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let index = write_index(temp.path());

    search(&index)
        .args(["--subject", "Benedictines", "--subject", "Monasticism"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0 records"))
        .stdout(predicate::str::contains("No records match"));

    search(&index)
        .args(["--state", "subject=Benedictines&subject=History&era=Early+Modern"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1 record\n"))
        .stdout(predicate::str::contains("vol-0"));
}

#[test]
fn facets_count_the_filtered_rows() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let index = write_index(temp.path());

    search(&index)
        .args(["--collection", "Patristics", "--facets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[subject]"))
        .stdout(predicate::str::contains("   1  Monasticism"))
        .stdout(predicate::str::contains("Benedictines").not());
}

#[test]
fn unknown_era_is_rejected() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let index = write_index(temp.path());

    search(&index)
        .args(["--era", "Bronze Age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown era `Bronze Age`"));
}

#[test]
fn missing_index_reports_search_unavailable() {
    let temp = tempfile::TempDir::new().expect("tempdir");

    search(&temp.path().join("missing.json"))
        .assert()
        .failure()
        .stdout("Search unavailable\n")
        .stderr(predicate::str::contains("missing.json"));
}
