//! Shell runner tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use adbnet::exec::runner::{CommandRunner, ShellRunner};
use futures::StreamExt;

fn runner(tool: &str) -> ShellRunner {
    ShellRunner::new(Arc::new(tool.to_string()))
}

#[tokio::test]
async fn test_missing_tool_yields_single_error_line() {
    let lines: Vec<String> = runner("/nonexistent/platform-tools/adb")
        .run("adb devices")
        .collect()
        .await;
    assert_eq!(lines, vec!["error: tool not found: /nonexistent/platform-tools/adb".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_tool_path_is_substituted() {
    let lines: Vec<String> = runner("echo").run("adb hello world").collect().await;
    assert_eq!(lines, vec!["hello world".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stderr_is_merged_in_order() {
    let lines: Vec<String> = runner("adb")
        .run("echo out; echo err 1>&2; echo done")
        .collect()
        .await;
    assert_eq!(lines, vec!["out", "err", "done"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_crlf_and_exit_status() {
    let lines: Vec<String> = runner("adb").run("printf 'a\\r\\nb\\r\\n'; exit 3").collect().await;
    assert_eq!(lines, vec!["a", "b"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_lines_are_delivered_incrementally() {
    let start = Instant::now();
    let mut lines = runner("adb").run("echo first; sleep 5; echo second");

    let first = tokio::time::timeout(Duration::from_secs(3), lines.next()).await;
    assert_eq!(first.unwrap(), Some("first".to_string()));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[cfg(unix)]
#[tokio::test]
async fn test_dropping_stream_stops_process() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");
    let command = format!("echo started; sleep 1; touch '{}'", marker.display());

    let mut lines = runner("adb").run(&command);
    assert_eq!(lines.next().await, Some("started".to_string()));
    drop(lines);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(!marker.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_runs_are_independent() {
    let r = runner("adb");
    let first: Vec<String> = r.run("echo again").collect().await;
    let second: Vec<String> = r.run("echo again").collect().await;
    assert_eq!(first, second);
    assert_eq!(first, vec!["again"]);
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("never");
    let lines = runner("adb").run(&format!("touch '{}'", marker.display()));

    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(lines);
    assert!(!marker.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_input_text_reaches_tool_literally() {
    // An absolute path bypasses the shell's builtin echo, which interprets backslashes.
    let echo = adbnet::exec::runner::find_executable("echo").unwrap();
    let r = runner(&echo.display().to_string());
    let invocation = adbnet::exec::invocation::input_text("$(echo HOST_RAN) `id -un`");

    let lines: Vec<String> = r.run(&invocation).collect().await;
    assert_eq!(lines, vec!["shell input text $\\(echo%sHOST_RAN\\)%s`id%s-un`"]);
}
