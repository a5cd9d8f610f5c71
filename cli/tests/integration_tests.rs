//! End-to-end tests for the `man2json` binary using saved manual pages.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn man2json_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_man2json"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("discovery")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(man2json_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run man2json")
}

fn run_input(command: &str, fixture_name: &str, extra: &[&str]) -> Output {
    let input = fixture(fixture_name);
    let input = input.to_str().expect("fixture path should be UTF-8");
    let mut args = vec![command, "--input", input];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"))
}

#[test]
fn input_file_prints_single_tool_document() {
    let output = run_input("grep", "gnu-grep.txt", &[]);
    assert!(
        output.status.success(),
        "man2json failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1, "compact output is one line");

    let parsed = stdout_json(&output);
    assert_eq!(parsed["tool"]["name"], "grep");
    let params = parsed["tool"]["parameters"].as_array().unwrap();
    assert_eq!(params[0]["name"], "PATTERNS");
    assert_eq!(params[0]["position"], 1);
    assert!(params.iter().any(|p| p["name"] == "--color[=WHEN]"
        && p["param-type"] == "option-equals"
        && p["value-type"] == "string"));
}

#[test]
fn pretty_flag_indents_output() {
    let output = run_input("curl", "curl.txt", &["--pretty"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("{\n  \"tool\": {\n"));
    let parsed = stdout_json(&output);
    assert_eq!(parsed["tool"]["name"], "curl");
}

#[test]
fn yaml_and_markdown_formats() {
    let yaml = run_input("ls", "ls.txt", &["--format", "yaml"]);
    assert!(yaml.status.success());
    let yaml_out = String::from_utf8_lossy(&yaml.stdout);
    assert!(yaml_out.contains("name: ls"));
    assert!(yaml_out.contains("param-type: option-equals"));

    let md = run_input("ls", "ls.txt", &["--format", "markdown"]);
    assert!(md.status.success());
    let md_out = String::from_utf8_lossy(&md.stdout);
    assert!(md_out.contains("# ls"));
    assert!(md_out.contains("## Options"));
}

#[test]
fn output_file_is_created_then_appended() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("tools.json");
    let target_str = target.to_str().unwrap();

    let first = run_input("grep", "bsd-grep.txt", &["-o", target_str]);
    assert!(
        first.status.success(),
        "{}",
        String::from_utf8_lossy(&first.stderr)
    );
    assert!(first.stdout.is_empty());
    assert!(String::from_utf8_lossy(&first.stderr).contains("Created"));

    let second = run_input("curl", "curl.txt", &["--output", target_str, "--pretty"]);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("Appended curl"));

    let contents = fs::read_to_string(&target).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let tools = parsed["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "grep");
    assert_eq!(tools[1]["name"], "curl");
}

#[test]
fn output_file_with_non_array_tools_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("tools.json");
    fs::write(&target, r#"{"tools": "nope"}"#).unwrap();

    let output = run_input("true", "true.txt", &["-o", target.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
    assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"tools": "nope"}"#);
}

#[test]
fn output_file_with_invalid_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("tools.json");
    fs::write(&target, "{ not json").unwrap();

    let output = run_input("true", "true.txt", &["-o", target.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn input_requires_exactly_one_command() {
    let input = fixture("true.txt");
    let output = run(&["true", "false", "--input", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly one command"));
}

#[test]
fn missing_input_file_fails() {
    let output = run(&["grep", "--input", "/nonexistent/grep.1.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn no_sources_reports_each_command_and_fails() {
    let output = run(&["alpha", "beta", "--no-local", "--no-web"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("alpha"));
    assert!(stderr.contains("beta"));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_command_name_is_rejected() {
    let output = run(&["../etc/passwd", "--no-web"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid command name"));
}

#[test]
fn config_file_adds_heading() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        "dialect:\n  headings:\n    - { text: \"NAME\", kind: name }\n    - { text: \"PARAMETERS\", kind: options }\n",
    )
    .unwrap();
    let page = dir.path().join("tool.txt");
    fs::write(&page, "NAME\n     tool - do things\nPARAMETERS\n     -x   Extra.\n").unwrap();

    let output = run(&[
        "tool",
        "--input",
        page.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed = stdout_json(&output);
    assert_eq!(parsed["tool"]["description"], "do things");
    assert_eq!(parsed["tool"]["parameters"][0]["name"], "-x");
}

#[test]
fn invalid_dialect_pattern_fails_before_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "dialect:\n  entry_start_patterns: [\"(unclosed\"]\n").unwrap();

    let output = run(&[
        "alpha",
        "beta",
        "--no-local",
        "--no-web",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: invalid pattern '(unclosed'"), "{stderr}");
    assert!(!stderr.contains("alpha"), "{stderr}");
}
