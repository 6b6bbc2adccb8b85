//! End-to-end tests: run the `hsh` binary with piped standard input.

use std::fs::{self, File, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const SYSTEM_PATH: &str = "/bin:/usr/bin";

fn hsh(input: &str, path: &str, cwd: &Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hsh"))
        .arg0("hsh")
        .env_clear()
        .env("PATH", path)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn hsh");
    // The shell may exit before consuming everything (e.g. after `exit`).
    let _ = child.stdin.take().expect("stdin").write_all(input.as_bytes());
    child.wait_with_output().expect("wait hsh")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn script(dir: &Path, name: &str, body: &str, mode: u32) {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f.sync_all().unwrap();
    drop(f);
    fs::set_permissions(&path, Permissions::from_mode(mode)).unwrap();
}

#[test]
fn test_echo_hi() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("echo hi\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stdout(&out), "hi\n");
    assert_eq!(stderr(&out), "");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_exit_code_terminates_immediately() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("exit 3\necho never\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stdout(&out), "");
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn test_exit_variants() {
    let cwd = TempDir::new().unwrap();
    for (input, code) in [("exit\n", 0), ("exit 0\n", 0), ("exit 7\n", 7), ("false\nexit\n", 0)] {
        let out = hsh(input, SYSTEM_PATH, cwd.path());
        assert_eq!(out.status.code(), Some(code), "{input:?}");
        assert_eq!(stderr(&out), "");
    }
}

#[test]
fn test_exit_illegal_number() {
    let cwd = TempDir::new().unwrap();
    for arg in ["-1", "abc"] {
        let out = hsh(&format!("exit {arg}\necho never\n"), SYSTEM_PATH, cwd.path());
        assert_eq!(out.status.code(), Some(2));
        assert_eq!(stdout(&out), "");
        assert_eq!(stderr(&out), format!("hsh: 1: exit: Illegal number: {arg}\n"));
    }
}

#[test]
fn test_not_found_continues() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("/nonexistent\necho after\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stderr(&out), "hsh: 1: /nonexistent: not found\n");
    assert_eq!(stdout(&out), "after\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_last_status_is_exit_code() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("no_such_command_for_hsh\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stderr(&out), "hsh: 1: no_such_command_for_hsh: not found\n");
    assert_eq!(out.status.code(), Some(127));
}

#[test]
fn test_whitespace_lines_keep_status() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("false\n   \n\t\n \t \n", SYSTEM_PATH, cwd.path());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "");
}

#[test]
fn test_env_lists_environment() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("env\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stdout(&out), format!("PATH={SYSTEM_PATH}\n"));
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_child_exit_code_round_trip() {
    let bin = TempDir::new().unwrap();
    script(bin.path(), "code", "#!/bin/sh\nexit \"$1\"\n", 0o755);
    let path = format!("{}:{SYSTEM_PATH}", bin.path().display());

    for n in [0, 1, 42, 255] {
        let out = hsh(&format!("code {n}\n"), &path, bin.path());
        assert_eq!(out.status.code(), Some(n));
    }
}

#[test]
fn test_path_order_first_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    script(first.path(), "tool", "#!/bin/sh\necho first\n", 0o755);
    script(second.path(), "tool", "#!/bin/sh\necho second\n", 0o755);

    let path = format!("{}:{}", first.path().display(), second.path().display());
    let out = hsh("tool\n", &path, first.path());
    assert_eq!(stdout(&out), "first\n");

    let path = format!("{}:{}", second.path().display(), first.path().display());
    let out = hsh("tool\n", &path, first.path());
    assert_eq!(stdout(&out), "second\n");
}

#[test]
fn test_permission_denied() {
    let bin = TempDir::new().unwrap();
    script(bin.path(), "tool", "echo never\n", 0o644);

    let out = hsh("tool\n", bin.path().to_str().unwrap(), bin.path());
    assert_eq!(stderr(&out), "hsh: 1: tool: Permission denied\n");
    assert_eq!(out.status.code(), Some(126));
}

#[test]
fn test_relative_path_in_working_directory() {
    let cwd = TempDir::new().unwrap();
    fs::create_dir(cwd.path().join("sub")).unwrap();
    script(cwd.path(), "hello", "#!/bin/sh\necho hello \"$1\"\n", 0o755);

    let out = hsh("./hello you\n./sub/../hello again\n", "", cwd.path());
    assert_eq!(stdout(&out), "hello you\nhello again\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_empty_path_has_no_cwd_fallback() {
    let cwd = TempDir::new().unwrap();
    script(cwd.path(), "hello", "#!/bin/sh\necho hello\n", 0o755);

    let out = hsh("hello\n", "", cwd.path());
    assert_eq!(stdout(&out), "");
    assert_eq!(stderr(&out), "hsh: 1: hello: not found\n");
    assert_eq!(out.status.code(), Some(127));
}

#[test]
fn test_no_prompt_when_piped() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("", SYSTEM_PATH, cwd.path());
    assert_eq!(stdout(&out), "");
    assert_eq!(stderr(&out), "");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_buffered_lines_are_not_seen_by_children() {
    let cwd = TempDir::new().unwrap();
    let out = hsh("cat\nhello_from_hsh_input\n", SYSTEM_PATH, cwd.path());
    assert_eq!(stdout(&out), "");
    assert_eq!(stderr(&out), "hsh: 1: hello_from_hsh_input: not found\n");
    assert_eq!(out.status.code(), Some(127));
}
