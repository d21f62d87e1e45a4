// End-to-end tests for the tiershift binary.
//
// Each test builds a scratch data directory from the engine fixtures:
//   20180301-magic-cards.csv  (baseline.csv)
//   20180415-magic-cards.csv  (current.csv)
//   AllCards.json
//   tiershift.toml            (data_dir = ".")
//
// Run with: cargo test -p tiershift-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn recon_fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../recon/tests/fixtures")
}

fn scratch() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = recon_fixtures();
    for (from, to) in [
        ("baseline.csv", "20180301-magic-cards.csv"),
        ("current.csv", "20180415-magic-cards.csv"),
        ("AllCards.json", "AllCards.json"),
    ] {
        std::fs::copy(fixtures.join(from), dir.path().join(to)).unwrap();
    }
    std::fs::write(
        dir.path().join("tiershift.toml"),
        "name = \"binder\"\ndata_dir = \".\"\n\n[thresholds]\nbulk_ceiling = 1.00\ntrade_floor = 6.00\n",
    )
    .unwrap();
    dir
}

fn tiershift(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("tiershift.toml");
    Command::new(env!("CARGO_BIN_EXE_tiershift"))
        .current_dir(dir)
        .env_remove("TIERSHIFT_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("spawn tiershift")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn assert_success(out: &Output) {
    assert!(
        out.status.success(),
        "exit code: {:?}\nstderr: {}",
        out.status,
        stderr(out)
    );
}

// ===========================================================================
// run
// ===========================================================================

#[test]
fn run_json_discovers_snapshots() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["run", "--json", "--no-history"]);
    assert_success(&out);

    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{}", stdout(&out)));

    assert_eq!(val["meta"]["config_name"], "binder");
    assert_eq!(val["meta"]["bulk_ceiling_cents"], 100);
    assert_eq!(val["meta"]["trade_floor_cents"], 600);

    let overall = &val["statistics"]["overall"];
    assert_eq!(overall["count"], 10);
    assert_eq!(overall["net_value_change_cents"], -1510);
    assert_eq!(overall["total_value_cents"], 4970);

    let sections = val["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 9);
    assert_eq!(sections[0]["bucket"], "trade_to_dollar");
    assert_eq!(sections[0]["entries"][0]["name"], "Tarmogoyf");
    assert_eq!(sections[8]["bucket"], "unchanged");

    assert!(!dir.path().join("history.jsonl").exists());
}

#[test]
fn run_text_report_and_history() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["run"]);
    assert_success(&out);

    let text = stdout(&out);
    assert!(text.contains("baseline: 20180301-magic-cards.csv"), "{text}");
    assert!(text.contains("current:  20180415-magic-cards.csv"), "{text}");
    assert!(text.contains("== trade → dollar =="), "{text}");
    assert!(text.contains("== bulk → trade =="), "{text}");
    assert!(!text.contains("== unchanged =="), "migrations only by default\n{text}");
    assert!(stderr(&out).contains("6 migrated"), "{}", stderr(&out));

    let history = std::fs::read_to_string(dir.path().join("history.jsonl")).unwrap();
    assert_eq!(history.lines().count(), 1);
    let record: serde_json::Value = serde_json::from_str(history.lines().next().unwrap()).unwrap();
    assert_eq!(record["baseline"], "20180301-magic-cards.csv");
    assert_eq!(record["migrated"], 6);

    let out = tiershift(dir.path(), &["history", "--json"]);
    assert_success(&out);
    let runs: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(runs.as_array().unwrap().len(), 1);
}

#[test]
fn run_all_includes_new_and_gone() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["run", "--all", "--no-history"]);
    assert_success(&out);
    let text = stdout(&out);
    assert!(text.contains("== new =="), "{text}");
    assert!(text.contains("== gone =="), "{text}");
    assert!(text.contains("Thoughtseize"), "{text}");
}

#[test]
fn run_writes_output_files() {
    let dir = scratch();
    let out = tiershift(
        dir.path(),
        &[
            "run",
            "--no-history",
            "--output",
            "result.json",
            "--report",
            "report.txt",
            "--export",
            "inventory.csv",
        ],
    );
    assert_success(&out);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("result.json")).unwrap()).unwrap();
    assert_eq!(json["statistics"]["overall"]["count"], 10);

    let report = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(report.starts_with("tiershift report: binder"));

    let inventory = std::fs::read_to_string(dir.path().join("inventory.csv")).unwrap();
    assert_eq!(inventory.lines().count(), 11);
    assert!(inventory.lines().any(|l| l.starts_with("new,Black,Thoughtseize,")));
}

#[test]
fn run_explicit_snapshots() {
    let dir = scratch();
    let fixtures = recon_fixtures();
    let baseline = fixtures.join("baseline.csv");
    let current = fixtures.join("current.csv");
    let out = tiershift(
        dir.path(),
        &[
            "run",
            current.to_str().unwrap(),
            "--baseline",
            baseline.to_str().unwrap(),
            "--json",
            "--no-history",
        ],
    );
    assert_success(&out);
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["statistics"]["overall"]["count"], 10);
}

#[test]
fn run_json_rejects_report_on_stdout() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["run", "--json", "--report", "-", "--no-history"]);
    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("--report - conflicts with --json"));
}

#[test]
fn run_report_dash_prints_text_once() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["run", "--report", "-", "--no-history"]);
    assert_success(&out);
    assert_eq!(stdout(&out).matches("tiershift report: binder").count(), 1);
}

#[test]
fn run_overflowing_value_exits_21() {
    let dir = scratch();
    std::fs::write(
        dir.path().join("20180501-magic-cards.csv"),
        "Count,Name,Edition,Card Number,Condition,Foil,Price\n100000000000,Tarmogoyf,Modern Masters,178,Near Mint,,\"$1,000,000.00\"\n",
    )
    .unwrap();
    let out = tiershift(dir.path(), &["run", "--no-history"]);
    assert_eq!(out.status.code(), Some(21), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("Tarmogoyf"));
}

#[test]
fn run_without_baseline_is_usage_error() {
    let dir = scratch();
    std::fs::remove_file(dir.path().join("20180301-magic-cards.csv")).unwrap();
    let out = tiershift(dir.path(), &["run", "--no-history"]);
    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("--baseline"));
}

#[test]
fn run_duplicate_identity_exits_22() {
    let dir = scratch();
    std::fs::copy(
        recon_fixtures().join("current-duplicate.csv"),
        dir.path().join("20180501-magic-cards.csv"),
    )
    .unwrap();
    let out = tiershift(dir.path(), &["run", "--no-history"]);
    assert_eq!(out.status.code(), Some(22), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("Lightning Bolt"));
    assert!(stdout(&out).is_empty());
}

#[test]
fn run_malformed_price_exits_21() {
    let dir = scratch();
    std::fs::copy(
        recon_fixtures().join("current-malformed.csv"),
        dir.path().join("20180501-magic-cards.csv"),
    )
    .unwrap();
    let out = tiershift(dir.path(), &["run", "--no-history"]);
    assert_eq!(out.status.code(), Some(21), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("20180501-magic-cards.csv"));
}

#[test]
fn run_missing_library_falls_back_to_unknown() {
    let dir = scratch();
    std::fs::remove_file(dir.path().join("AllCards.json")).unwrap();
    let out = tiershift(dir.path(), &["run", "--json", "--no-history"]);
    assert_success(&out);
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    for section in val["sections"].as_array().unwrap() {
        for entry in section["entries"].as_array().unwrap() {
            assert_eq!(entry["sort_category"], "Unknown");
        }
    }
}

#[test]
fn run_bad_library_exits_23() {
    let dir = scratch();
    std::fs::write(dir.path().join("AllCards.json"), "[not a library").unwrap();
    let out = tiershift(dir.path(), &["run", "--no-history"]);
    assert_eq!(out.status.code(), Some(23), "stderr: {}", stderr(&out));
}

// ===========================================================================
// validate / classify
// ===========================================================================

#[test]
fn validate_prints_thresholds() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["validate"]);
    assert_success(&out);
    assert!(stdout(&out).contains("bulk < $1.00 <= dollar < $6.00 <= trade"), "{}", stdout(&out));
}

#[test]
fn validate_rejects_inverted_thresholds() {
    let dir = scratch();
    std::fs::write(
        dir.path().join("tiershift.toml"),
        "[thresholds]\nbulk_ceiling = 6.00\ntrade_floor = 1.00\n",
    )
    .unwrap();
    let out = tiershift(dir.path(), &["validate"]);
    assert_eq!(out.status.code(), Some(20), "stderr: {}", stderr(&out));
}

#[test]
fn classify_boundaries_are_inclusive() {
    let dir = scratch();
    let cases = [
        (["0.99", "1.00"], "bulk_to_dollar"),
        (["5.99", "6.00"], "dollar_to_trade"),
        (["$7.00", "0.50"], "trade_to_bulk"),
        (["2.00", "3.00"], "unchanged"),
    ];
    for ([old, new], expected) in cases {
        let out = tiershift(dir.path(), &["classify", old, new]);
        assert_success(&out);
        assert_eq!(stdout(&out).trim(), expected, "{old} → {new}");
    }
}

#[test]
fn classify_rejects_bad_price() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["classify", "N/A", "1.00"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn history_empty_is_ok() {
    let dir = scratch();
    let out = tiershift(dir.path(), &["history"]);
    assert_success(&out);
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("No runs recorded"));
}
