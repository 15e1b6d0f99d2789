use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const MANIFEST: &str = r#"
controllers:
  - name: Root
    namespace: ""
    actions:
      - name: index
        attributes: ":Path('/') :Args(0)"
  - name: Users
    namespace: users
    actions:
      - name: show
        attributes: ":Local :Args(1)"
      - name: base
        attributes: ":Chained('/') :PathPart('members') :CaptureArgs(1)"
      - name: view
        attributes: ":Chained('base') :PathPart('') :Args(0)"
"#;

fn manifest_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write manifest");
    file
}

fn brrtdispatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_brrtdispatch"))
        .env_remove("BRRTD_SHOW_INTERNAL_ACTIONS")
        .env("BRRTD_LOG_LEVEL", "error")
        .args(args)
        .output()
        .expect("run cli")
}

#[test]
fn test_cli_routes_prints_tables() {
    let file = manifest_file(MANIFEST);
    let manifest = file.path().to_str().expect("utf-8 path");
    let output = brrtdispatch(&["routes", "--manifest", manifest]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded Private actions:"), "{stdout}");
    assert!(stdout.contains("/users/show"), "{stdout}");
    assert!(stdout.contains("Loaded Path actions:"), "{stdout}");
    assert!(stdout.contains("Loaded Chained actions:"), "{stdout}");
    assert!(!stdout.contains("_DISPATCH"), "{stdout}");
}

#[test]
fn test_cli_resolve_reports_matches_and_misses() {
    let file = manifest_file(MANIFEST);
    let manifest = file.path().to_str().expect("utf-8 path");
    let output = brrtdispatch(&[
        "resolve",
        "--manifest",
        manifest,
        "/users/show/5",
        "/members/7",
        "/nowhere",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{stdout}");
    assert!(lines[0].starts_with("/users/show/5 -> /users/show args=[\"5\"]"), "{stdout}");
    assert!(lines[0].ends_with("ok=true"), "{stdout}");
    assert!(lines[1].contains("captures=[\"7\"]"), "{stdout}");
    assert!(lines[1].contains("trail=[\"users/base\", \"users/view\"]"), "{stdout}");
    assert_eq!(lines[2], "/nowhere -> Unknown resource \"nowhere\".");
}

#[test]
fn test_cli_uri() {
    let file = manifest_file(MANIFEST);
    let manifest = file.path().to_str().expect("utf-8 path");

    let output = brrtdispatch(&["uri", "--manifest", manifest, "--action", "users/view", "42"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "/members/42");

    let output = brrtdispatch(&["uri", "--manifest", manifest, "--action", "users/missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown action"));
}

#[test]
fn test_cli_duplicate_with_diagnostics_exits_1() {
    let file = manifest_file(
        "controllers:\n  - name: First\n    namespace: dup\n  - name: Second\n    namespace: dup\n",
    );
    let manifest = file.path().to_str().expect("utf-8 path");

    let lenient = brrtdispatch(&["routes", "--manifest", manifest]);
    assert!(lenient.status.success());

    let strict = Command::new(env!("CARGO_BIN_EXE_brrtdispatch"))
        .env("BRRTD_SHOW_INTERNAL_ACTIONS", "1")
        .env("BRRTD_LOG_LEVEL", "error")
        .args(["routes", "--manifest", manifest])
        .output()
        .expect("run cli");
    assert_eq!(strict.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("already registered"), "{stderr}");
}

#[test]
fn test_cli_missing_manifest_fails() {
    let output = brrtdispatch(&["routes", "--manifest", "/nonexistent/app.yaml"]);
    assert_eq!(output.status.code(), Some(1));
}
