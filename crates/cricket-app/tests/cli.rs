use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn gocricket() -> Command {
    Command::cargo_bin("gocricket").expect("binary built")
}

#[test]
fn plays_a_seeded_game_to_the_end() {
    gocricket()
        .args(["--seed", "17", "--name", "Tester"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Game started! Ask other players for cards."))
        .stdout(predicate::str::contains("Game Over!"))
        .stdout(predicate::str::contains("Tester"));
}

#[test]
fn json_output_is_a_sanitized_view() {
    let output = gocricket()
        .args(["--seed", "5", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json view");
    assert_eq!(view["phase"], "finished");
    assert!(view["winner"].is_string());
    assert_eq!(view["players"].as_array().map(Vec::len), Some(4));
}

#[test]
fn validate_only_checks_the_config_file() {
    let dir = tempdir().expect("temp dir");
    let good = dir.path().join("session.yaml");
    std::fs::write(
        &good,
        "seed: 3\npacing:\n  cpu_turn_delay_ms: 10\nlogging:\n  enabled: false\n",
    )
    .expect("write config");
    gocricket()
        .args(["--validate-only", "--config"])
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration ok"));

    let bad = dir.path().join("bad.yaml");
    std::fs::write(&bad, "players:\n  - name: Solo\n").expect("write config");
    gocricket()
        .args(["--validate-only", "--config"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("players"));
}

#[test]
fn file_logging_writes_json_lines() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("logs").join("session.jsonl");
    let config = dir.path().join("session.yaml");
    std::fs::write(
        &config,
        format!(
            "seed: 9\nlogging:\n  tracing_level: debug\n  json: true\n  file: \"{}\"\n",
            log.display()
        ),
    )
    .expect("write config");

    gocricket().arg("--config").arg(&config).assert().success();
    let contents = std::fs::read_to_string(&log).expect("log written");
    assert!(contents.contains("cricket_core::game"));
}
