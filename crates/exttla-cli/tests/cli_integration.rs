//! Integration tests running the `exttla` binary end to end.

use std::fs;
use std::process::Command;

fn exttla() -> Command {
    Command::new(env!("CARGO_BIN_EXE_exttla"))
}

#[test]
fn converts_two_module_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("counter.exttla");
    fs::write(
        &input,
        r"
module Base {
  var x: {\ Nat \} = 0
  operation Inc {\ x' = x + 1 \}
}
module Child extends Base {
}",
    )
    .unwrap();

    let out_dir = dir.path().join("out");
    let output = exttla()
        .arg(&input)
        .arg("-o")
        .arg(&out_dir)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Create TLA+ Spec: Base"));
    assert!(stdout.contains("Create TLA+ Spec: Child"));

    let child = fs::read_to_string(out_dir.join("Child.tla")).unwrap();
    assert!(child.contains(" MODULE Child "));
    assert!(child.contains("Inc == x' = x + 1\n  /\\ UNCHANGED <<>>\n"));
    assert!(fs::read_to_string(out_dir.join("Base.tla")).is_ok());
}

#[test]
fn no_input_files_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");

    let output = exttla().arg("-o").arg(&out_dir).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn merges_modules_across_input_files() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.exttla");
    let child = dir.path().join("child.exttla");
    fs::write(&base, "module Base { var x: any = 0 }").unwrap();
    fs::write(&child, "module Child extends Base {}").unwrap();

    let out_dir = dir.path().join("out");
    let output = exttla()
        .arg(&base)
        .arg(&child)
        .arg("-o")
        .arg(&out_dir)
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = fs::read_to_string(out_dir.join("Child.tla")).unwrap();
    assert!(text.contains("VARIABLE x"));
}

#[test]
fn unknown_base_module_fails_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.exttla");
    fs::write(&input, "module Child extends Ghost {}").unwrap();

    let output = exttla()
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ghost"));
}

#[test]
fn parse_error_reports_location() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.exttla");
    fs::write(&input, "module {").unwrap();

    let output = exttla()
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse error"));
}
