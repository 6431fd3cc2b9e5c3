// tests/integration_test.rs
use std::io::Write;
use std::process::{Command, Output};

fn planner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_publish-planner"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute publish-planner")
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("publisher.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "git_folder = {:?}", dir.path().to_str().unwrap()).unwrap();
    writeln!(file, "local_repository = {:?}", dir.path().join("m2").to_str().unwrap()).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_publish_planner_help() {
    let output = planner(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("publish-planner"));
    assert!(stdout.contains("--property"));
    assert!(stdout.contains("--format"));
}

#[test]
fn test_publish_planner_version() {
    let output = planner(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("publish-planner "));
}

#[test]
fn test_env_output_for_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "[project]\ngroup = \"org.acme\"\nname = \"widget\"\nversion = \"1.2.3\"\n");

    let output = planner(&[
        "--config",
        &config,
        "--branch",
        "feature/x",
        "--format",
        "env",
        "-P",
        "mavenPassword=hunter2",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PUBLISH_VERSION=1.2.3-feature-x-SNAPSHOT\n"));
    assert!(stdout.contains("PUBLISH_SHOULD_PUBLISH=true\n"));
    assert!(stdout.contains("PUBLISH_SHOULD_SIGN=false\n"));
    assert!(!stdout.contains("hunter2"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("hunter2"));
}

#[test]
fn test_toml_output_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "alter_project_version = false\n");

    let output = planner(&[
        "--config",
        &config,
        "--branch",
        "dev",
        "--group",
        "org.acme",
        "--artifact",
        "widget",
        "--base-version",
        "2.0.0",
        "--format",
        "toml",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let value: toml::Value = toml::from_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(value["version"].as_str(), Some("2.0.0-dev-SNAPSHOT"));
    assert_eq!(value["project_version"].as_str(), Some("2.0.0"));
    assert_eq!(value["artifact"].as_str(), Some("org.acme:widget:2.0.0-dev-SNAPSHOT"));
}

#[test]
fn test_configuration_error_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        "[project]\ngroup = \"org.acme\"\nname = \"widget\"\n\n[prod]\ntarget = \"nexus\"\n",
    );

    let output = planner(&["--config", &config, "--branch", "v1.0.0"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("custom_command"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_format_is_rejected() {
    let output = planner(&["--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
}
