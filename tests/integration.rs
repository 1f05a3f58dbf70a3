use std::process::{Command, Output};

use systract::{DumpReader, Error, Extractor, LinuxX86_64, SystemCall};

fn extract_dump(path: &str) -> systract::Result<Vec<SystemCall>> {
    systract::extract(&DumpReader::new(path))
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_systract"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run systract")
}

fn ids(syscalls: &[SystemCall]) -> Vec<u16> {
    syscalls.iter().map(|s| s.id).collect()
}

#[test]
fn single_syscall() {
    let syscalls = extract_dump("tests/fixtures/single-syscall.dump").expect("Extraction failed");
    assert_eq!(
        syscalls,
        vec![SystemCall {
            id: 231,
            name: "exit_group".to_string()
        }]
    );
}

#[test]
fn program_reachability() {
    let syscalls = extract_dump("tests/fixtures/program.dump").expect("Extraction failed");

    // kill (62) only appears in an unreachable symbol, 999 is no syscall at all
    assert_eq!(ids(&syscalls), vec![0, 1, 39, 60, 102, 231]);
    let names: Vec<&str> = syscalls.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["read", "write", "getpid", "exit", "getuid", "exit_group"]);
}

#[test]
fn repeated_extraction_is_stable() {
    let extractor = Extractor::new(LinuxX86_64);
    let reader = DumpReader::new("tests/fixtures/program.dump");
    let first = extractor.extract(&reader).unwrap();
    let second = extractor.extract(&reader).unwrap();
    let parallel = Extractor::new(LinuxX86_64).parallel(true).extract(&reader).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, parallel);
}

#[test]
fn library_is_unsupported() {
    let err = extract_dump("tests/fixtures/library.dump").unwrap_err();
    assert!(matches!(err, Error::UnsupportedInput { .. }), "{err}");
}

#[test]
fn missing_dump_is_input_access_error() {
    let err = extract_dump("tests/fixtures/does-not-exist.dump").unwrap_err();
    assert!(err.is_input_access(), "{err}");
}

#[test]
fn cli_prints_syscalls() {
    let output = run_cli(&["extract", "--dumpfile", "tests/fixtures/single-syscall.dump"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1 system calls found:\n    exit_group (231)\n"
    );
}

#[test]
fn cli_json_output() {
    let output = run_cli(&[
        "extract",
        "-d",
        "--format",
        "json",
        "tests/fixtures/single-syscall.dump",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!([{"id": 231, "name": "exit_group"}]));
}

#[test]
fn cli_template_output() {
    let output = run_cli(&[
        "extract",
        "-d",
        "--template",
        "{name},",
        "tests/fixtures/program.dump",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "read,write,getpid,exit,getuid,exit_group,"
    );
}

#[test]
fn cli_rejects_bad_template() {
    let output = run_cli(&[
        "extract",
        "-d",
        "--template",
        "{Something}",
        "tests/fixtures/single-syscall.dump",
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid template"));
}

#[test]
fn cli_reports_unsupported_input() {
    let output = run_cli(&["extract", "--dumpfile", "tests/fixtures/library.dump"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: could not find entry point"));
}
