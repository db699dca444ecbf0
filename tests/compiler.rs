#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use tinyc_test::compiler::{Compiler, ExternalCompiler};

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn large_output_is_drained_not_mistaken_for_a_timeout() {
    // A fast compiler that prints more than the OS pipe buffer holds must
    // still finish well inside the timeout.
    let dir = tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "big-output.sh",
        "head -c 1048576 /dev/zero | tr '\\0' 'x'\nexit 0\n",
    );

    let mut compiler = ExternalCompiler::new(script);
    compiler.timeout = Some(Duration::from_secs(5));

    let out = compiler.run_phase("--parse", "int main() { return 0; }").unwrap();
    assert_eq!(out.exit_code, 0);
    assert_eq!(out.output.len(), 1_048_576);
    assert!(out.output.bytes().all(|b| b == b'x'));
}

#[test]
fn stdout_and_stderr_are_combined_newline_joined() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "both.sh", "echo out\necho err >&2\n");

    let compiler = ExternalCompiler::new(script);
    let out = compiler.run_phase("--parse", "int main() {}").unwrap();
    assert_eq!(out.output, "out\nerr");
    assert_eq!(out.exit_code, 0);
}

#[test]
fn nonzero_exit_code_is_captured() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "fail.sh", "echo nope >&2\nexit 3\n");

    let compiler = ExternalCompiler::new(script);
    let out = compiler.run_phase("--parse", "int main( {").unwrap();
    assert_eq!(out.exit_code, 3);
    assert_eq!(out.output, "nope");
}

#[test]
fn hung_compiler_reports_a_timeout() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "hang.sh", "sleep 30\n");

    let mut compiler = ExternalCompiler::new(script);
    compiler.timeout = Some(Duration::from_secs(1));

    let err = compiler.run_phase("--parse", "int main() {}").unwrap_err();
    assert!(err.to_string().contains("timed out after 1 s"), "{err}");
}

#[test]
fn validate_checks_path_commands_and_bare_names() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "ok.sh", "exit 0\n");

    assert!(ExternalCompiler::new(script).validate().is_ok());
    assert!(ExternalCompiler::new("sh").validate().is_ok());
    assert!(ExternalCompiler::new("/nonexistent/tinyc").validate().is_err());
    assert!(ExternalCompiler::new("surely-not-a-real-binary-name").validate().is_err());
}
