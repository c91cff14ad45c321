use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn integration_enabled() -> bool {
    std::env::var("CRITIC_INTEGRATION").is_ok()
}

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("critic").unwrap()
}

// --- Help & version ---

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local code review"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("critic"));
}

#[test]
fn serve_help() {
    cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"));
}

// --- Mode validation ---

#[test]
fn bare_critic_requires_target() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(&tmp)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("specify a file or directory"));
}

#[test]
fn unknown_flag_rejected() {
    cmd().arg("--bogus").assert().failure().code(2);
}

// --- Config errors ---

#[test]
fn config_file_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(&tmp)
        .args(["src/", "--config", "/nonexistent.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_toml_config() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("critic.toml"), "not valid {{{{ toml").unwrap();
    cmd()
        .current_dir(&tmp)
        .arg("src/")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn temperature_out_of_range_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("critic.toml"), "temperature = 9.5\n").unwrap();
    cmd()
        .current_dir(&tmp)
        .arg("src/")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("temperature must be"));
}

// --- Discovery errors ---

#[test]
fn missing_target_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(&tmp)
        .arg("no_such_file.py")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("target not found"));
}

#[test]
fn no_reviewable_files_exits_two() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    cmd()
        .current_dir(&tmp)
        .arg(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No reviewable files found."));
}

#[test]
fn too_many_files_exits_two() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a.py", "b.py", "c.py"] {
        fs::write(tmp.path().join(name), "print('x')\n").unwrap();
    }
    cmd()
        .current_dir(&tmp)
        .args([tmp.path().to_str().unwrap(), "--max-files", "2"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Too many files (3)"));
}

// --- Review loop (model unreachable) ---

#[test]
fn unreachable_model_degrades_and_saves_report() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("app.py"), "print('x')\n").unwrap();
    cmd()
        .current_dir(&tmp)
        .args(["app.py", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File: app.py"))
        .stdout(predicate::str::contains("Saved:"));

    let saved: Vec<_> = fs::read_dir(tmp.path().join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].to_str().unwrap().contains("app_py_"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&saved[0]).unwrap()).unwrap();
    assert_eq!(report["path"], "app.py");
    assert_eq!(report["score"], 0);
    assert!(
        report["summary"]
            .as_str()
            .unwrap()
            .starts_with("Review failed:")
    );
}

// --- Live review (requires a running Ollama server) ---

#[test]
fn review_single_file_live() {
    if !integration_enabled() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("hello.py"), "print('hello')\n").unwrap();
    cmd()
        .current_dir(&tmp)
        .arg("hello.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("File: hello.py"))
        .stdout(predicate::str::contains("Saved:"));
}
