#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;

fn fault() -> Command {
    let mut cmd = Command::cargo_bin("fault").unwrap();
    cmd.env_remove("ACCESS_KEY_ID")
        .env_remove("ACCESS_KEY_SECRET")
        .env_remove("FAULTFLOW_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn test_cli_help() {
    fault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("aliyun"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_cli_version() {
    fault()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("faultflow"));
}

#[test]
fn test_list_shows_supported_types() {
    fault()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ecs"))
        .stdout(predicate::str::contains("start, stop, reboot"))
        .stdout(predicate::str::contains("detach, attach"))
        .stdout(predicate::str::contains("vSwitch"));
}

#[test]
fn test_action_help_shows_flags_and_examples() {
    fault()
        .args(["aliyun", "disk", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--diskId"))
        .stdout(predicate::str::contains("--accessKeySecret"))
        .stdout(predicate::str::contains("support detach, attach"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_missing_region_is_reported() {
    fault()
        .args([
            "aliyun",
            "ecs",
            "--accessKeyId",
            "id",
            "--accessKeySecret",
            "secret",
            "--type",
            "stop",
            "--instances",
            "i-1",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""code":45000"#))
        .stdout(predicate::str::contains("less parameter: `regionId`"));
}

#[test]
fn test_credentials_fall_back_to_env() {
    fault()
        .env("ACCESS_KEY_ID", "id")
        .env("ACCESS_KEY_SECRET", "secret")
        .args(["aliyun", "ecs", "--regionId", "cn-hangzhou", "--type", "frobnicate"])
        .args(["--instances", "i-1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""code":47000"#))
        .stdout(predicate::str::contains("support(support start, stop, reboot)"));
}

#[test]
fn test_unreachable_endpoint_is_request_failed() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("faultflow.yaml");
    std::fs::write(
        &config,
        "aliyun:\n  endpoint: http://127.0.0.1:1\n  timeout_secs: 5\n",
    )
    .unwrap();

    fault()
        .arg("--config")
        .arg(&config)
        .args(["aliyun", "ecs", "--accessKeyId", "id", "--accessKeySecret", "secret"])
        .args(["--regionId", "cn-hangzhou", "--type", "stop", "--instances", "i-1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""code":48000"#))
        .stdout(predicate::str::contains("describe ecs status failed"));
}

#[test]
fn test_missing_config_file_fails() {
    fault()
        .args(["--config", "/nonexistent/faultflow.yaml"])
        .args(["aliyun", "ecs", "--type", "stop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    fault()
        .args(["aliyun", "ecs", "--diskId", "d-1"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_command() {
    fault().arg("invalid-command").assert().failure();
}
