use assert_cmd::Command;
use predicates::prelude::*;

/// Run the binary with an isolated HOME and a backend address nothing listens on.
fn caixa(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("caixa").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

const DEAD_BACKEND: &str = "http://127.0.0.1:9/api/loteria";

#[test]
fn compute_reconciles_offline() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "compute",
            "--opening",
            "100,00",
            "--supply",
            "50",
            "--withdrawal",
            "20",
            "--machine-count",
            "135",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("R$ 130,00"))
        .stdout(predicate::str::contains("R$ 5,00"))
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn compute_flags_large_variance() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "compute",
            "--opening",
            "100",
            "--supply",
            "50",
            "--withdrawal",
            "20",
            "--machine-count",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-R$ 30,00"))
        .stdout(predicate::str::contains("NEEDS REVIEW"));
}

#[test]
fn compute_without_count_is_pending() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args(["compute", "--opening", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PENDING"));
}

#[test]
fn movement_without_description_is_blocked() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "--api-url",
            DEAD_BACKEND,
            "movement",
            "add",
            "1",
            "--kind",
            "sangria",
            "--amount",
            "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Description is required"));
}

#[test]
fn closing_without_machine_count_is_blocked() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args(["--api-url", DEAD_BACKEND, "closing", "save", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Machine count is required"));
}

#[test]
fn closing_with_negative_count_is_blocked() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "--api-url",
            DEAD_BACKEND,
            "closing",
            "save",
            "2",
            "--machine-count",
            "-5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));
}

#[test]
fn compute_rejects_amounts_beyond_backend_limit() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "compute",
            "--opening",
            "79228162514264337593543950335",
            "--supply",
            "79228162514264337593543950335",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn unknown_register_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args(["--api-url", DEAD_BACKEND, "register", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown register: 9"));
}

#[test]
fn unreachable_backend_fails_without_retry() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args(["--api-url", DEAD_BACKEND, "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));
}

#[test]
fn init_writes_settings() {
    let home = tempfile::tempdir().unwrap();
    caixa(&home)
        .args([
            "init",
            "http://caixa.local:5000/api/loteria/",
            "--registers",
            "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registers:  4"));

    let path = home.path().join(".config").join("caixa").join("settings.json");
    let content = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["api_url"], "http://caixa.local:5000/api/loteria");
    assert_eq!(json["registers"], 4);

    caixa(&home)
        .args(["--api-url", DEAD_BACKEND, "register", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("registers are numbered 1 to 4"));
}
