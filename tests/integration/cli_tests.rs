use std::fs;

use assert_cmd::Command;
use contract_client::config::ClientConfig;

use crate::{create_test_dir, write_mock_metadata};

const CLIENT_BINARY_NAME: &str = "contracts";

// INIT TESTS
// ================================================================================================

#[test]
fn test_init_with_defaults() {
    let dir = create_test_dir();

    let mut init_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    init_cmd.current_dir(&dir).args(["init", "--default"]);
    init_cmd.assert().success();

    let config = ClientConfig::load(&dir.join("contract-client.toml")).unwrap();
    assert_eq!(config.api.endpoint.to_string(), "http://localhost:8080");

    // A second init must not overwrite the existing file.
    let mut init_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    init_cmd.current_dir(&dir).args(["init", "--default"]);
    init_cmd.assert().failure();
}

#[test]
fn test_init_with_endpoint() {
    let dir = create_test_dir();

    let mut init_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    init_cmd
        .current_dir(&dir)
        .args(["init", "--default", "--endpoint", "https://contracts.example.org:9443"]);
    init_cmd.assert().success();

    let contents = fs::read_to_string(dir.join("contract-client.toml")).unwrap();
    assert!(contents.contains("contracts.example.org"));

    let config = ClientConfig::load(&dir.join("contract-client.toml")).unwrap();
    assert_eq!(config.api.endpoint.to_string(), "https://contracts.example.org:9443");
}

#[test]
fn test_commands_require_config() {
    let dir = create_test_dir();

    let mut contracts_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    contracts_cmd.current_dir(&dir).args(["contracts"]);
    let output = contracts_cmd.output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("init"));
}

// VALIDATE TESTS
// ================================================================================================

#[test]
fn test_validate_accepts_valid_arguments() {
    let dir = create_test_dir();
    let metadata = write_mock_metadata(&dir);

    let mut validate_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    validate_cmd.current_dir(&dir).args([
        "validate",
        "--metadata",
        metadata.to_str().unwrap(),
        "nestedArr1",
        "--args",
        r#"{"first": [1, 2, 3, 4, 5]}"#,
    ]);
    validate_cmd.assert().success();
}

#[test]
fn test_validate_rejects_wrong_length() {
    let dir = create_test_dir();
    let metadata = write_mock_metadata(&dir);

    let mut validate_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    validate_cmd.current_dir(&dir).args([
        "validate",
        "--metadata",
        metadata.to_str().unwrap(),
        "nestedArr1",
        "--args",
        r#"{"first": [1, 2, 3]}"#,
    ]);
    let output = validate_cmd.output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected 5"));
}

#[test]
fn test_validate_reads_arguments_file() {
    let dir = create_test_dir();
    let metadata = write_mock_metadata(&dir);
    let args_path = dir.join("args.json");
    fs::write(&args_path, r#"{"value": -4, "label": "x"}"#).unwrap();

    let mut validate_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    validate_cmd.current_dir(&dir).args([
        "validate",
        "--metadata",
        metadata.to_str().unwrap(),
        "setValue",
        "--args",
        &format!("@{}", args_path.display()),
    ]);
    validate_cmd.assert().failure();
}

#[test]
fn test_validate_lists_methods() {
    let dir = create_test_dir();
    let metadata = write_mock_metadata(&dir);

    let mut validate_cmd = Command::cargo_bin(CLIENT_BINARY_NAME).unwrap();
    validate_cmd.current_dir(&dir).args(["validate", "--metadata", metadata.to_str().unwrap()]);
    let output = validate_cmd.output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nestedArr4"));
}
