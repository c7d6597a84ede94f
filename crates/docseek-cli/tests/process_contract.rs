use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_docseek"))
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .arg("--root")
        .arg(root)
        .arg("--offline")
        .args(args)
        .env_remove("DOCSEEK_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run docseek")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn status_on_fresh_root_reports_empty_store() {
    // Given a fresh root
    // When running `docseek status`
    // Then the process succeeds and prints a zero-document status.
    let temp = tempdir().expect("tempdir");
    let status = stdout_json(&run(&temp.path().join("state"), &["status"]));
    assert_eq!(status["documents"], 0);
    assert_eq!(status["provider"], "offline");
}

#[test]
fn index_and_search_round_trip_through_process() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(corpus.join("tax-return-2023.txt"), "Federal tax return 2023").expect("write");
    let state = temp.path().join("state");

    let report = stdout_json(&run(
        &state,
        &["index", corpus.to_str().expect("corpus path")],
    ));
    assert_eq!(report["indexed"], 1);

    let results = stdout_json(&run(&state, &["search", "tax return", "--limit", "5"]));
    assert_eq!(results.as_array().map(Vec::len), Some(1));
}

#[test]
fn malformed_config_file_fails_with_context() {
    let temp = tempdir().expect("tempdir");
    let config = temp.path().join("docseek.toml");
    fs::write(&config, "[ranking\nmin_score =").expect("write config");

    let output = run(
        &temp.path().join("state"),
        &["--config", config.to_str().expect("config path"), "status"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let payload: Value = serde_json::from_str(stderr.lines().last().unwrap_or_default())
        .unwrap_or_else(|err| panic!("stderr is not a payload ({err}): {stderr}"));
    assert_eq!(payload["code"], "TOML_ERROR");
    assert_eq!(payload["operation"], "status");
    assert!(
        payload["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("failed to load config")),
        "stderr: {stderr}"
    );
}

#[test]
fn strict_index_of_missing_folder_reports_not_found() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("missing");
    let output = Command::new(cli_bin_path())
        .arg("--root")
        .arg(temp.path().join("state"))
        .arg("--offline")
        .arg("index")
        .arg(&missing)
        .env_remove("DOCSEEK_CONFIG")
        .env_remove("RUST_LOG")
        .env("DOCSEEK_INDEX_STRICT", "1")
        .output()
        .expect("run docseek");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let payload: Value = serde_json::from_str(stderr.lines().last().unwrap_or_default())
        .unwrap_or_else(|err| panic!("stderr is not a payload ({err}): {stderr}"));
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["operation"], "index");
    assert_eq!(payload["path"], missing.display().to_string());
}
