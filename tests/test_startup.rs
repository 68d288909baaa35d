//! Process-level startup tests
//!
//! Runs the built binary in an empty working directory so no default config
//! file is picked up, with stdin closed so a started server exits on EOF.

use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_server(credentials: &[(&str, &str)]) -> Output {
    let workdir = TempDir::new().unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_naver-search-mcp"));
    command
        .arg("serve")
        .current_dir(workdir.path())
        .env_remove("NAVER_CLIENT_ID")
        .env_remove("NAVER_CLIENT_SECRET")
        .env_remove("NAVER_SEARCH_MCP_CONFIG")
        .env("LOG_LEVEL", "error")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (name, value) in credentials {
        command.env(name, value);
    }

    command.output().unwrap()
}

#[test]
fn test_missing_credentials_exit_before_serving() {
    let output = run_server(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout: {:?}", output.stdout);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NAVER_CLIENT_ID"), "stderr: {stderr}");
}

#[test]
fn test_empty_credentials_count_as_missing() {
    let output = run_server(&[("NAVER_CLIENT_ID", ""), ("NAVER_CLIENT_SECRET", "")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout: {:?}", output.stdout);
}

#[test]
fn test_server_with_credentials_exits_cleanly_on_eof() {
    let output = run_server(&[
        ("NAVER_CLIENT_ID", "test-id"),
        ("NAVER_CLIENT_SECRET", "test-secret"),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty(), "stdout: {:?}", output.stdout);
}
