//! End-to-end CLI tests for the hfetch binary.

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hfetch() -> Command {
    let mut cmd = Command::cargo_bin("hfetch").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run_hfetch(args: Vec<String>, dir: PathBuf) -> Output {
    tokio::task::spawn_blocking(move || {
        hfetch()
            .arg("--no-config")
            .args(&args)
            .current_dir(dir)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    hfetch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--limit-rate"))
        .stdout(predicate::str::contains("--max-filesize"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    hfetch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hfetch"));
}

/// Test that invalid flags cause a usage error.
#[test]
fn test_binary_invalid_flag_returns_error() {
    hfetch()
        .arg("--invalid-flag")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_missing_url_fails() {
    hfetch()
        .arg("--no-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no URL specified"));
}

#[test]
fn test_binary_bad_size_is_usage_error() {
    hfetch()
        .args(["--limit-rate", "abcK", "example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--limit-rate"));
}

#[test]
fn test_binary_missing_data_file_fails_before_network() {
    // Port 9 (discard) is never contacted; the @file error comes first.
    hfetch()
        .args(["--no-config", "-d", "@/definitely/not/here.json", "127.0.0.1:9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/definitely/not/here.json"));
}

#[test]
fn test_binary_invalid_config_file_is_reported() {
    let config_home = TempDir::new().unwrap();
    let config_dir = config_home.path().join("hfetch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "retries = 3\n").unwrap();

    hfetch()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("example.com")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_writes_body_to_stdout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec![format!("{}/hello", mock_server.uri())],
        dir.path().to_path_buf(),
    )
    .await;

    output.assert().success().stdout("hello world");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_output_flag_writes_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("file body"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec!["-o".to_string(), "saved.txt".to_string(), mock_server.uri()],
        dir.path().to_path_buf(),
    )
    .await;

    output.assert().success().stdout("");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("saved.txt")).unwrap(),
        "file body"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_remote_name_uses_content_disposition() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", r#"attachment; filename="report.csv""#)
                .set_body_string("a,b\n1,2\n"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec!["-O".to_string(), format!("{}/export", mock_server.uri())],
        dir.path().to_path_buf(),
    )
    .await;

    output.assert().success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("report.csv")).unwrap(),
        "a,b\n1,2\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_remote_name_falls_back_to_url_segment() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tarball"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec![
            "-O".to_string(),
            format!("{}/dist/pkg-1.0.tar.gz", mock_server.uri()),
        ],
        dir.path().to_path_buf(),
    )
    .await;

    output.assert().success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("pkg-1.0.tar.gz")).unwrap(),
        "tarball"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_verbose_prints_request_head_before_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec![
            "-v".to_string(),
            "-d".to_string(),
            r#"{"a":1}"#.to_string(),
            format!("{}/submit", mock_server.uri()),
        ],
        dir.path().to_path_buf(),
    )
    .await;

    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    output.assert().success();
    assert!(
        stdout.starts_with(&format!("HTTP/1.1 POST {}/submit\n", mock_server.uri())),
        "unexpected stdout: {stdout}"
    );
    assert!(stdout.contains("Content-Type: application/json\n"));
    assert!(stdout.contains("Content-Length: 7\n"));
    assert!(stdout.ends_with("\n\ndone"), "unexpected stdout: {stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_max_filesize_caps_output() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 5000]))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(
        vec![
            "--max-filesize".to_string(),
            "2000".to_string(),
            "-o".to_string(),
            "capped.bin".to_string(),
            mock_server.uri(),
        ],
        dir.path().to_path_buf(),
    )
    .await;

    output.assert().success();
    assert_eq!(
        std::fs::read(dir.path().join("capped.bin")).unwrap().len(),
        2000
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_head_flag_prints_response_head() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-probe", "yes"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run_hfetch(vec!["-I".to_string(), mock_server.uri()], dir.path().to_path_buf())
        .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::starts_with("HTTP/1.1 200 OK\n"))
        .stdout(predicate::str::contains("X-Probe: yes\n"));
}
