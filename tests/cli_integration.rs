use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn seoscope(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("seoscope").unwrap();
    cmd.env("SEOSCOPE_HOME", home).env_remove("SEOSCOPE_LOG");
    cmd
}

/// A crawl output directory: three pages, one image, one error and an audit.
fn crawl_dir(root: &Path) -> std::path::PathBuf {
    let source = root.join("crawl");
    for dir in ["pages", "images", "errors"] {
        fs::create_dir_all(source.join(dir)).unwrap();
    }
    fs::write(source.join("pages/home.json"), r#"{"status": 200}"#).unwrap();
    fs::write(source.join("pages/old.json"), r#"{"status": 301}"#).unwrap();
    fs::write(source.join("pages/gone.json"), r#"{"status": 404}"#).unwrap();
    fs::write(source.join("pages/notes.txt"), "not a record").unwrap();
    fs::write(source.join("images/logo.json"), r#"{"alt": ""}"#).unwrap();
    fs::write(source.join("errors/timeout.json"), r#"{"url": "/slow"}"#).unwrap();
    fs::write(
        source.join("audit.json"),
        r#"{
            "summary": {"issue_counts": {"missing_alt": 5, "thin_content": 9, "no_h1": 9, "slow": 1}},
            "items": [{"issues": ["a", "b"]}, {"issues": ["c"]}]
        }"#,
    )
    .unwrap();
    source
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn imported(home: &TempDir) {
    let source = crawl_dir(home.path());
    seoscope(home.path())
        .args(["import", "acme"])
        .arg(&source)
        .args(["--run", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 record(s) into acme/r1"))
        .stdout(predicate::str::contains("Skipped non-JSON file pages/notes.txt"));
}

#[test]
fn test_start_and_list_runs() {
    let home = TempDir::new().unwrap();

    seoscope(home.path())
        .args(["start", "acme", "20240501-080000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started run acme/20240501-080000"));

    assert!(home
        .path()
        .join("projects/acme/runs/20240501-080000/pages")
        .is_dir());

    seoscope(home.path())
        .args(["runs", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20240501-080000"))
        .stdout(predicate::str::contains("not summarized"));
}

#[test]
fn test_start_existing_run_fails() {
    let home = TempDir::new().unwrap();
    seoscope(home.path()).args(["start", "acme", "r1"]).assert().success();

    seoscope(home.path())
        .args(["start", "acme", "r1"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_project_name_rejected() {
    let home = TempDir::new().unwrap();
    seoscope(home.path())
        .args(["summarize", "..", "r1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn test_home_flag_overrides_env() {
    let env_home = TempDir::new().unwrap();
    let flag_home = TempDir::new().unwrap();

    seoscope(env_home.path())
        .arg("--home")
        .arg(flag_home.path())
        .args(["start", "acme", "r1"])
        .assert()
        .success();

    assert!(flag_home.path().join("projects/acme/runs/r1").is_dir());
    assert!(!env_home.path().join("projects").exists());
}

#[test]
fn test_summarize_and_record_timeseries() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["summarize", "acme", "r1", "--record"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary acme/r1"))
        .stdout(predicate::str::contains(
            "Summarized acme/r1: 3 pages, 1 images, 1 errors, 3 issues",
        ))
        .stdout(predicate::str::contains("(1 entries)"));

    let summary = read_json(&home.path().join("projects/acme/runs/r1/summary.json"));
    assert_eq!(summary["pages"], 3);
    assert_eq!(summary["status"]["2xx"], 1);
    assert_eq!(summary["status"]["3xx"], 1);
    assert_eq!(summary["status"]["4xx"], 1);
    assert_eq!(summary["status"]["other"], 0);
    assert_eq!(summary["issues"]["total"], 3);

    seoscope(home.path())
        .args(["record", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 entries)"));

    let timeseries = read_json(&home.path().join("projects/acme/timeseries.json"));
    assert_eq!(timeseries["project"], "acme");
    let items = timeseries["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["run_id"], "r1");
    assert_eq!(items[0]["4xx"], 1);

    seoscope(home.path())
        .args(["timeseries", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ISSUES"))
        .stdout(predicate::str::contains("r1"));
}

#[test]
fn test_record_without_summary_fails() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["record", "acme", "r1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No summary built for acme/r1"));
    assert!(!home.path().join("projects/acme/timeseries.json").exists());
}

#[test]
fn test_report_orders_top_issues() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["config", "base-url", "acme", "https://acme.test/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base-url for acme set to https://acme.test"));

    seoscope(home.path())
        .args(["report", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report acme/r1"))
        .stdout(predicate::str::contains("https://acme.test"));

    let report = read_json(&home.path().join("projects/acme/runs/r1/report.json"));
    assert_eq!(report["base_url"], "https://acme.test");
    assert_eq!(report["crawl"]["pages_count"], 3);
    assert_eq!(report["crawl"]["images_count"], 1);
    assert_eq!(report["audit"]["items"].as_array().unwrap().len(), 2);

    let keys: Vec<&str> = report["top_issues"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["thin_content", "no_h1", "missing_alt", "slow"]);
}

#[test]
fn test_report_without_base_url_warns() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["report", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No base-url configured for acme"));
}

#[test]
fn test_sections_and_print() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["section", "set", "acme", "r1", "Intro", "Quarterly", "crawl"])
        .assert()
        .success();

    seoscope(home.path())
        .args(["section", "set", "acme", "r1", "Next steps"])
        .write_stdin("Fix the **404s**.\n")
        .assert()
        .success();

    seoscope(home.path())
        .args(["section", "list", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intro"))
        .stdout(predicate::str::contains("Fix the **404s**."));

    seoscope(home.path())
        .args(["print", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# SEO report: acme"))
        .stdout(predicate::str::contains("| 1 | thin_content | 9 |"))
        .stdout(predicate::str::contains("## Intro\n\nQuarterly crawl"))
        .stdout(predicate::str::contains("## Next steps"));

    let out = home.path().join("report.html");
    seoscope(home.path())
        .args(["print", "acme", "r1", "--html", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<strong>404s</strong>"));
    assert!(html.contains("<table>"));

    seoscope(home.path())
        .args(["section", "rm", "acme", "r1", "Intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed section 'Intro'"));

    let sections = read_json(&home.path().join("projects/acme/runs/r1/sections.json"));
    let names: Vec<&String> = sections.as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["Next steps"]);
}

#[test]
fn test_export_creates_archive() {
    let home = TempDir::new().unwrap();
    imported(&home);
    let dest = home.path().join("out");

    seoscope(home.path())
        .args(["export", "acme", "r1", "--dest"])
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 6 file(s)"));

    let archive = dest.join("acme-r1.tar.gz");
    let bytes = fs::read(archive).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
}

#[test]
fn test_binary_records_import_and_export() {
    let home = TempDir::new().unwrap();
    let source = crawl_dir(home.path());
    fs::write(source.join("images/a.json"), [0xff, 0xfe, 0x00]).unwrap();
    fs::write(source.join("images/b.json"), r#"{"alt": "b"}"#).unwrap();

    seoscope(home.path())
        .args(["import", "acme"])
        .arg(&source)
        .args(["--run", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 7 record(s) into acme/r1"));

    let images = home.path().join("projects/acme/runs/r1/images");
    assert_eq!(fs::read(images.join("a.json")).unwrap(), [0xff, 0xfe, 0x00]);
    assert!(images.join("b.json").is_file());

    seoscope(home.path())
        .args(["summarize", "acme", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 pages, 3 images"));

    let dest = home.path().join("out");
    seoscope(home.path())
        .args(["export", "acme", "r1", "--dest"])
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 9 file(s)"));
}

#[test]
fn test_section_set_on_unknown_run_fails() {
    let home = TempDir::new().unwrap();
    imported(&home);

    seoscope(home.path())
        .args(["section", "set", "acme", "r2", "Intro", "typo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No run acme/r2"));
    assert!(!home.path().join("projects/acme/runs/r2").exists());
}

#[test]
fn test_config_show_all() {
    let home = TempDir::new().unwrap();

    seoscope(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects configured."));

    seoscope(home.path())
        .args(["config", "base-url", "acme", "ftp://acme.test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));

    seoscope(home.path())
        .args(["config", "base-url", "acme", "https://acme.test"])
        .assert()
        .success();

    seoscope(home.path())
        .args(["config", "base-url", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::diff("https://acme.test\n"));

    seoscope(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("acme  https://acme.test"));
}

#[test]
fn test_broken_config_is_an_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.json"), "{ nope").unwrap();

    seoscope(home.path())
        .args(["runs", "acme"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_init_creates_store() {
    let home = TempDir::new().unwrap();
    let root = home.path().join("store");

    seoscope(home.path())
        .arg("--home")
        .arg(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized seoscope store"));
    assert!(root.join("projects").is_dir());
}

#[test]
fn test_grouped_help() {
    let home = TempDir::new().unwrap();
    seoscope(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build Commands:"))
        .stdout(predicate::str::contains("summarize"));
}
