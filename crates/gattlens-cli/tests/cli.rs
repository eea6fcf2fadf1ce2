use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gattlens"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> std::path::PathBuf {
    repo_root().join("tests").join("fixtures").join(name)
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode").and(contains("replay")));
    cmd().arg("replay").arg("--help").assert().success();
}

#[test]
fn decode_heart_rate_by_name() {
    let assert = cmd()
        .arg("decode")
        .arg("heart-rate-measurement")
        .arg("06:4b")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["kind"], "records");
    assert_eq!(value["value"][0]["type"], "heart_rate");
    assert_eq!(value["value"][0]["heart_rate"], 75);
    assert_eq!(value["value"][0]["sensor_contact"], true);
}

#[test]
fn decode_battery_by_assigned_number() {
    let assert = cmd().arg("decode").arg("0x2A19").arg("5a").assert().success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["kind"], "metadata");
    assert_eq!(value["value"]["kind"], "battery_level");
    assert_eq!(value["value"]["value"], 90);
}

#[test]
fn decode_throughput() {
    let assert = cmd()
        .arg("decode")
        .arg("throughput")
        .arg("05000000-64000000-c8000000")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    let metrics = &value["value"][0];
    assert_eq!(metrics["gatt_writes"], 5);
    assert_eq!(metrics["total_bytes"], 100);
    assert_eq!(metrics["bits_per_second"], 200);
}

#[test]
fn decode_truncated_payload_fails() {
    cmd()
        .arg("decode")
        .arg("throughput")
        .arg("0500")
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("throughput")));
}

#[test]
fn decode_ambiguous_number_shows_hint() {
    cmd()
        .arg("decode")
        .arg("0x2A52")
        .arg("06000101")
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn decode_rejects_bad_hex() {
    cmd()
        .arg("decode")
        .arg("battery-level")
        .arg("5g")
        .assert()
        .failure()
        .stderr(contains("invalid hex digit"));
}

#[test]
fn characteristics_lists_names() {
    cmd()
        .arg("characteristics")
        .assert()
        .success()
        .stdout(contains("glucose-racp").and(contains("0x2A37")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.txt");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn replay_stdout_outputs_json() {
    let assert = cmd()
        .arg("replay")
        .arg(fixture("glucose_session.txt"))
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["report_version"], 1);
    assert_eq!(value["devices"][0]["device"], "meter");
}

#[test]
fn replay_writes_report_file() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("replay")
        .arg(fixture("fitness.txt"))
        .arg("-o")
        .arg(&report)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let text = std::fs::read_to_string(&report).expect("report written");
    let value: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["devices"].as_array().map(Vec::len), Some(2));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(fixture("fitness.txt"))
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("replay")
        .arg(fixture("fitness.txt"))
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_path_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("session.txt");
    std::fs::copy(fixture("fitness.txt"), &input).expect("copy fixture");

    cmd()
        .arg("replay")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("must differ from input"));
}

#[test]
fn config_changes_wheel_circumference() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.json");
    std::fs::write(&config, r#"{"wheel_circumference_mm": 2000}"#).expect("write config");

    let assert = cmd()
        .arg("replay")
        .arg(fixture("fitness.txt"))
        .arg("--stdout")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    let speed = value["devices"][0]["connections"][0]["services"][0]["csc"]["speed_mps"]
        .as_f64()
        .expect("speed");
    assert!((speed - 20.0).abs() < 1e-9);
}

#[test]
fn invalid_config_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.json");
    std::fs::write(&config, r#"{"wheel_size": 2000}"#).expect("write config");

    cmd()
        .arg("replay")
        .arg(fixture("fitness.txt"))
        .arg("--stdout")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(contains("invalid config file").and(contains("hint:")));
}

#[test]
fn transcript_errors_name_the_line() {
    cmd()
        .arg("replay")
        .arg(fixture("malformed.txt"))
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("line 3"));
}

#[test]
fn glob_with_multiple_matches_fails() {
    let pattern = repo_root().join("tests").join("fixtures").join("*.txt");
    cmd()
        .arg("replay")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern"));
}
