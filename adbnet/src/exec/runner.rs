//! Shell command execution as a lazy line stream
//!
//! A [`LineStream`] is pull-based: the process is only spawned when the stream is
//! first polled, each poll reads at most one line, and nothing keeps running once the
//! stream is dropped. Launch and read failures never surface as `Err`; they end the
//! stream with a single `error: <message>` line.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader, Split};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, warn};

use crate::errors::AdbNetError;
use crate::exec::invocation::TOOL;

/// Output lines of one command, in order
pub type LineStream = BoxStream<'static, String>;

/// Prefix of the synthetic line that reports a launch or read failure
pub const ERROR_PREFIX: &str = "error: ";

pub fn error_line(message: impl std::fmt::Display) -> String {
    format!("{}{}", ERROR_PREFIX, message)
}

pub fn is_error_line(line: &str) -> bool {
    line.starts_with(ERROR_PREFIX)
}

/// Source of the configured tool path, read on every invocation
pub trait ToolPath: Send + Sync {
    fn tool_path(&self) -> String;
}

impl ToolPath for String {
    fn tool_path(&self) -> String {
        self.clone()
    }
}

/// Runs one invocation and streams its combined stdout/stderr
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &str) -> LineStream;
}

/// [`CommandRunner`] backed by the host shell
#[derive(Clone)]
pub struct ShellRunner {
    tool: Arc<dyn ToolPath>,
}

impl ShellRunner {
    pub fn new(tool: Arc<dyn ToolPath>) -> Self {
        Self { tool }
    }

    /// Resolve the command line the shell will execute.
    ///
    /// A leading `adb` token is replaced with the configured tool path, which must
    /// point at an existing executable.
    pub fn command_line(&self, invocation: &str) -> Result<String, AdbNetError> {
        let rest = match invocation.strip_prefix(TOOL) {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest,
            _ => return Ok(invocation.to_string()),
        };

        let tool = self.tool.tool_path();
        let tool = tool.trim();
        if find_executable(tool).is_none() {
            return Err(AdbNetError::ToolNotFound(tool.to_string()));
        }

        if tool.contains(char::is_whitespace) {
            Ok(format!("\"{}\"{}", tool, rest))
        } else {
            Ok(format!("{}{}", tool, rest))
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, invocation: &str) -> LineStream {
        let prepared = self.command_line(invocation);
        stream::unfold(RunState::Pending(prepared), step).boxed()
    }
}

/// Locate an executable: explicit paths are checked directly, bare names are
/// searched on `PATH`.
pub fn find_executable(tool: &str) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }

    let path = Path::new(tool);
    if path.components().count() > 1 || path.is_absolute() {
        return candidates(path).into_iter().find(|p| p.is_file());
    }

    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .flat_map(|dir| candidates(&dir.join(tool)))
        .find(|p| p.is_file())
}

#[cfg(windows)]
fn candidates(path: &Path) -> Vec<PathBuf> {
    let mut found = vec![path.to_path_buf()];
    if path.extension().is_none() {
        for ext in ["exe", "cmd", "bat"] {
            found.push(path.with_extension(ext));
        }
    }
    found
}

#[cfg(not(windows))]
fn candidates(path: &Path) -> Vec<PathBuf> {
    vec![path.to_path_buf()]
}

/// The host shell, with stderr folded into stdout so both arrive in write order.
#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut script = std::ffi::OsString::from("exec 2>&1\n");
    script.push(command_line);

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    // Own process group, so cancellation reaches everything the shell started.
    cmd.process_group(0);
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.raw_arg("/C").raw_arg(format!("({}) 2>&1", command_line));
    cmd
}

/// Kills the process (group) unless it has already been waited on.
struct Process {
    child: Child,
}

impl Drop for Process {
    fn drop(&mut self) {
        // `id` is `None` once the child has been reaped.
        let Some(pid) = self.child.id() else {
            return;
        };
        debug!("Killing abandoned process {}", pid);
        #[cfg(unix)]
        {
            // SAFETY: plain syscall; the child leads its own group (process_group(0)).
            unsafe {
                libc::killpg(pid as libc::pid_t, libc::SIGKILL);
            }
        }
        let _ = self.child.start_kill();
    }
}

enum RunState {
    Pending(Result<String, AdbNetError>),
    Reading {
        process: Process,
        lines: Split<BufReader<ChildStdout>>,
    },
    Done,
}

fn spawn(command_line: &str) -> Result<(Process, Split<BufReader<ChildStdout>>), AdbNetError> {
    debug!("Spawning: {}", command_line);
    let mut child = shell_command(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AdbNetError::Internal("stdout was not captured".into()))?;

    Ok((Process { child }, BufReader::new(stdout).split(b'\n')))
}

async fn step(state: RunState) -> Option<(String, RunState)> {
    match state {
        RunState::Pending(prepared) => match prepared.and_then(|line| spawn(&line)) {
            Ok((process, lines)) => read_next(process, lines).await,
            Err(e) => {
                warn!("Command could not be started: {}", e);
                Some((error_line(e), RunState::Done))
            }
        },
        RunState::Reading { process, lines } => read_next(process, lines).await,
        RunState::Done => None,
    }
}

async fn read_next(
    mut process: Process,
    mut lines: Split<BufReader<ChildStdout>>,
) -> Option<(String, RunState)> {
    match lines.next_segment().await {
        Ok(Some(segment)) => Some((decode_line(&segment), RunState::Reading { process, lines })),
        Ok(None) => match process.child.wait().await {
            Ok(status) => {
                debug!("Command finished: {}", status);
                None
            }
            Err(e) => Some((error_line(e), RunState::Done)),
        },
        Err(e) => {
            warn!("Reading command output failed: {}", e);
            Some((error_line(e), RunState::Done))
        }
    }
}

fn decode_line(segment: &[u8]) -> String {
    let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
    String::from_utf8_lossy(segment).into_owned()
}
