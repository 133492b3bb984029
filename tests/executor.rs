//! Executor tests against real child processes
#![cfg(unix)]

use gluster_block_rest::common::{ExecErrorKind, UNSET_EXIT_STATUS};
use gluster_block_rest::executor::{execute, CommandRunner, ProcessRunner};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_success_returns_stdout() {
    let out = execute("sh", &args(&["-c", r#"printf '{"ok":true}'"#]))
        .await
        .unwrap();
    assert_eq!(out, br#"{"ok":true}"#);
}

#[tokio::test]
async fn test_arguments_are_not_shell_expanded() {
    let out = execute("echo", &args(&["vol1/block1", "$HOME", "--json"]))
        .await
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "vol1/block1 $HOME --json\n");
}

#[tokio::test]
async fn test_nonzero_exit_propagates_status_and_stderr() {
    let err = execute("sh", &args(&["-c", "echo 'volume not found' >&2; exit 2"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ExecErrorKind::NonzeroExit);
    assert_eq!(err.exit_status, 2);
    assert_eq!(err.message, "volume not found");
}

#[tokio::test]
async fn test_nonzero_exit_uses_stdout_when_stderr_empty() {
    let err = execute(
        "sh",
        &args(&["-c", r#"echo '{"RESULT":"FAIL","errCode":22}'; exit 22"#]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_status, 22);
    assert_eq!(err.message, r#"{"RESULT":"FAIL","errCode":22}"#);
}

#[tokio::test]
async fn test_missing_binary_is_spawn_error() {
    let err = execute("/nonexistent/gluster-block", &args(&["info", "vol1/block1", "--json"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ExecErrorKind::Spawn);
    assert_eq!(err.exit_status, UNSET_EXIT_STATUS);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn test_process_runner_delegates() {
    let runner = ProcessRunner;
    let out = runner
        .run("sh", &args(&["-c", "printf ok"]))
        .await
        .unwrap();
    assert_eq!(out, b"ok");
}
