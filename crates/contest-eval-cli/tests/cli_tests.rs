//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn contest_eval() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("contest-eval").unwrap();
    cmd.env_remove("CONTEST_EVAL_RESULTS_ROOT")
        .env_remove("CONTEST_EVAL_K");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A results tree with one ICPC model, one IOI model, and one broken file.
fn results_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("results");
    write(
        &root,
        "gpt-4o-mini-2024/ICPC/run.json",
        r#"[{"graded_list": [true, false, false, false, false], "pass@1": 1}]"#,
    );
    write(&root, "gpt-4o-mini-2024/ICPC/broken.json", "[{");
    write(
        &root,
        "deepseek-r1/IOI/subs.json",
        r#"[
            {"problem_title": "Rings", "date": "IOI 2012 day 1", "problem_index": "B", "points": 100},
            {"problem_title": "Rings", "date": "IOI 2012 day 1", "problem_index": "B", "points": "40"}
        ]"#,
    );
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn summarize_writes_both_formats() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .arg("summarize")
        .arg("--results-root")
        .arg("results")
        .arg("--output-dir")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("ICPC summary saved to"))
        .stdout(predicate::str::contains("IOI summary saved to"))
        .stderr(predicate::str::contains("Failed to process"))
        .stderr(predicate::str::contains("broken.json"));

    let icpc = read_json(&dir.path().join("out/ICPC_results.json"));
    assert_eq!(
        icpc,
        serde_json::json!([{
            "Model": "gpt-4o-mini-2024",
            "Pass@1": 1.0,
            "Pass@5": 1.0,
            "URL": "https://openai.com/index/gpt-4o-mini-advancing-cost-efficient-intelligence/"
        }])
    );

    let ioi = read_json(&dir.path().join("out/IOI_results.json"));
    let entry = &ioi[0];
    assert_eq!(entry["Model"], "deepseek-r1");
    assert_eq!(entry["Pass@1"], 0.5);
    assert_eq!(entry["Pass@5"], 1.0);
    assert_eq!(entry["Average Points"], 70.0);
    assert_eq!(entry["URL"], "https://api-docs.deepseek.com/news/news250120");
}

#[test]
fn summarize_single_format_with_custom_k() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--results-root", "results", "--output-dir", "out"])
        .args(["--format", "ioi", "--k", "1"])
        .assert()
        .success();

    assert!(!dir.path().join("out/ICPC_results.json").exists());
    let ioi = read_json(&dir.path().join("out/IOI_results.json"));
    let entry = ioi[0].as_object().unwrap();
    assert!(entry.contains_key("Pass@1"));
    assert!(!entry.keys().any(|k| k.starts_with("Pass@") && k != "Pass@1"));
}

#[test]
fn summarize_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--results-root", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn summarize_rejects_zero_k() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--results-root", "results", "--k", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("k must be at least 1"));
}

#[test]
fn command_line_k_wins_over_invalid_env_k() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .env("CONTEST_EVAL_K", "0")
        .args(["summarize", "--results-root", "results", "--output-dir", "out"])
        .args(["--format", "icpc", "--k", "5"])
        .assert()
        .success();

    assert!(dir.path().join("out/ICPC_results.json").exists());
}

#[test]
fn summarize_prints_each_failure_once() {
    let dir = results_tree();

    let output = contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--results-root", "results", "--output-dir", "out"])
        .args(["--format", "icpc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("broken.json").count(), 1);
}

#[test]
fn summarize_reads_config_file() {
    let dir = results_tree();
    write(
        dir.path(),
        "contest-eval.toml",
        "results_root = \"results\"\noutput_dir = \"from-config\"\nk = 2\n",
    );

    contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--format", "icpc"])
        .assert()
        .success();

    let icpc = read_json(&dir.path().join("from-config/ICPC_results.json"));
    assert!(icpc[0].get("Pass@2").is_some());
}

#[test]
fn summarize_unknown_format_fails() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .args(["summarize", "--results-root", "results", "--format", "usaco"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown contest format"));
}

#[test]
fn validate_reports_failures() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .args(["validate", "--results-root", "results"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ICPC: 1 file(s) loaded"))
        .stdout(predicate::str::contains("IOI: 1 file(s) loaded"))
        .stdout(predicate::str::contains("(2 records)"))
        .stdout(predicate::str::contains("1 file(s) failed to load"));
}

#[test]
fn list_models_shows_urls() {
    let dir = results_tree();

    contest_eval()
        .current_dir(dir.path())
        .args(["list-models", "--results-root", "results"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deepseek-r1 [IOI]"))
        .stdout(predicate::str::contains("gpt-4o-mini-2024 [ICPC]"))
        .stdout(predicate::str::contains("news250120"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    contest_eval()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created contest-eval.toml"));

    assert!(dir.path().join("contest-eval.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    contest_eval().current_dir(dir.path()).arg("init").assert().success();

    contest_eval()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn compare_summaries() {
    let dir = TempDir::new().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");

    std::fs::write(
        &baseline_path,
        r#"[{"Model": "m1", "Pass@1": 0.6, "Pass@5": 0.8, "URL": ""}]"#,
    )
    .unwrap();
    std::fs::write(
        &current_path,
        r#"[{"Model": "m1", "Pass@1": 0.2, "Pass@5": 0.5, "URL": ""}]"#,
    )
    .unwrap();

    contest_eval()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 regressions"))
        .stdout(predicate::str::contains("m1 Pass@1 60.0% -> 20.0%"));

    contest_eval()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_summary() {
    contest_eval()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    contest_eval()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pass@k summaries"));
}

#[test]
fn version_output() {
    contest_eval()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("contest-eval"));
}
