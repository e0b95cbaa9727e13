//! tool::runner
//!
//! Subprocess execution with bounded lifetime.
//!
//! Every invocation pipes both output streams and drains them from
//! dedicated tasks while the parent awaits exit; draining a single stream
//! can deadlock once the other pipe's buffer fills. A wall-clock timeout
//! kills the child and synthesizes a failure result. The runner never
//! returns `Err`: refusals, spawn failures, and timeouts all come back as
//! [`ToolOutput`] values so callers classify along one path.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::config::{EngineConfig, DEFAULT_TIMEOUT_SECS};
use crate::tool::TOOL_BIN;

/// Characters refused in any argument. The protocol never needs them and
/// each is significant to some shell.
const DENIED_ARG_CHARS: [char; 13] = [
    ';', '&', '|', '`', '\'', '"', '$', '!', '*', '?', '<', '>', '\\',
];

/// Bound on waiting for reader tasks after the child is gone. A grandchild
/// holding the pipe open must not stall the caller.
const READER_GRACE: Duration = Duration::from_secs(1);

/// Bound on waiting for the child to die after a kill.
const KILL_GRACE: Duration = Duration::from_secs(1);

/// The complete result of one tool invocation.
///
/// Failure is data: a refused argument, a missing binary, a non-zero exit,
/// and a timeout all land here, distinguished by `exit_code`, `stderr`, and
/// `timed_out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ToolOutput {
    /// Whether the invocation ran to completion with exit code zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    fn refusal(reason: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: reason.into(),
            timed_out: false,
        }
    }
}

/// Spawns the tool and captures its output.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    binary: PathBuf,
    timeout: Duration,
}

impl ToolRunner {
    /// A runner invoking `mygit` from PATH with the default timeout.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(TOOL_BIN),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// A runner configured from an [`EngineConfig`].
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            binary: PathBuf::from(config.tool_binary()),
            timeout: config.timeout(),
        }
    }

    /// Override the binary path (tests point this at fixture scripts).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Override the wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one tool invocation in `repo_dir`.
    ///
    /// `command` is the logical command name and must equal [`TOOL_BIN`];
    /// `args` is the subcommand and its arguments. Both checks happen
    /// before any process is spawned, and a failed check synthesizes a
    /// refusal result instead of spawning.
    pub async fn execute(&self, repo_dir: &Path, command: &str, args: &[&str]) -> ToolOutput {
        if command != TOOL_BIN {
            warn!(command, "refusing unknown command name");
            return ToolOutput::refusal(format!("only {TOOL_BIN} commands are allowed"));
        }
        if args.iter().any(|arg| has_denied_chars(arg)) {
            warn!(?args, "refusing arguments with shell-significant characters");
            return ToolOutput::refusal("invalid characters in command arguments");
        }

        debug!(binary = %self.binary.display(), ?args, dir = %repo_dir.display(), "spawning tool");

        let mut child = match Command::new(&self.binary)
            .args(args)
            .current_dir(repo_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(binary = %self.binary.display(), error = %e, "spawn failed");
                return ToolOutput {
                    exit_code: -1,
                    stdout: String::new(),
                    stderr: format!("failed to spawn '{}': {e}", self.binary.display()),
                    timed_out: false,
                };
            }
        };

        // Streams are Some because both were set to piped above.
        let stdout_handle = child.stdout.take().map(spawn_drain);
        let stderr_handle = child.stderr.take().map(spawn_drain);

        enum ExitReason {
            Completed(i32),
            Timeout,
        }

        let exit_reason = tokio::select! {
            wait_result = child.wait() => {
                match wait_result {
                    Ok(status) => ExitReason::Completed(status.code().unwrap_or(-1)),
                    Err(e) => {
                        warn!(error = %e, "wait on child failed");
                        ExitReason::Completed(-1)
                    }
                }
            }
            _ = tokio::time::sleep(self.timeout) => ExitReason::Timeout,
        };

        let timed_out = matches!(exit_reason, ExitReason::Timeout);
        let exit_code = match exit_reason {
            ExitReason::Completed(code) => code,
            ExitReason::Timeout => {
                warn!(timeout_secs = self.timeout.as_secs(), "tool timed out, killing");
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "kill failed");
                }
                if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
                    warn!("child did not exit within kill grace");
                }
                -1
            }
        };

        let stdout = join_drain(stdout_handle).await;
        let mut stderr = join_drain(stderr_handle).await;
        if timed_out {
            if !stderr.is_empty() {
                stderr.push('\n');
            }
            stderr.push_str(&format!(
                "command timed out after {}s",
                self.timeout.as_secs()
            ));
        }

        debug!(exit_code, timed_out, "tool finished");
        ToolOutput {
            exit_code,
            stdout,
            stderr,
            timed_out,
        }
    }
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn has_denied_chars(arg: &str) -> bool {
    arg.chars().any(|c| DENIED_ARG_CHARS.contains(&c))
}

/// Drain one stream to completion on its own task.
fn spawn_drain<R>(stream: R) -> JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = stream;
        let mut buf = Vec::new();
        if let Err(e) = reader.read_to_end(&mut buf).await {
            warn!(error = %e, "error draining stream");
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Join a drain task, bounded by the reader grace period.
async fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    match tokio::time::timeout(READER_GRACE, handle).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(error = %e, "drain task failed");
            String::new()
        }
        Err(_) => {
            warn!("drain task did not finish within grace period");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_with_missing_binary() -> ToolRunner {
        // A binary that cannot exist: spawning it would fail loudly, so a
        // refusal result proves no spawn was attempted.
        ToolRunner::new().with_binary("/nonexistent/refscope-test-tool")
    }

    mod screening {
        use super::*;

        #[tokio::test]
        async fn wrong_command_name_refused_without_spawn() {
            let out = runner_with_missing_binary()
                .execute(Path::new("."), "git", &["log"])
                .await;
            assert_eq!(out.exit_code, 1);
            assert!(out.stderr.contains("mygit"));
            assert!(!out.stderr.contains("spawn"));
        }

        #[tokio::test]
        async fn denied_characters_refused_without_spawn() {
            for arg in [
                "a;b", "a&b", "a|b", "a`b", "a'b", "a\"b", "a$b", "a!b", "a*b", "a?b", "a<b",
                "a>b", "a\\b",
            ] {
                let out = runner_with_missing_binary()
                    .execute(Path::new("."), TOOL_BIN, &["log", arg])
                    .await;
                assert_eq!(out.exit_code, 1, "arg {arg:?} must be refused");
                assert!(out.stderr.contains("invalid characters"));
                assert!(!out.timed_out);
            }
        }

        #[tokio::test]
        async fn plain_arguments_pass_screening() {
            // Screening passes, so the missing binary surfaces as a spawn
            // failure rather than a refusal.
            let out = runner_with_missing_binary()
                .execute(Path::new("."), TOOL_BIN, &["ls-tree", "-r", "HEAD"])
                .await;
            assert_eq!(out.exit_code, -1);
            assert!(out.stderr.contains("failed to spawn"));
        }

        #[test]
        fn denied_char_predicate() {
            assert!(has_denied_chars("rm -rf; echo"));
            assert!(has_denied_chars("$(pwd)"));
            assert!(!has_denied_chars("feature/parser-v2"));
            assert!(!has_denied_chars("path with space"));
        }
    }

    mod results {
        use super::*;

        #[test]
        fn success_requires_zero_exit_and_no_timeout() {
            let ok = ToolOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: false,
            };
            assert!(ok.success());
            assert!(!ToolOutput { exit_code: 1, ..ok.clone() }.success());
            assert!(!ToolOutput { timed_out: true, ..ok }.success());
        }

        #[test]
        fn refusal_shape() {
            let out = ToolOutput::refusal("nope");
            assert_eq!(out.exit_code, 1);
            assert!(out.stdout.is_empty());
            assert_eq!(out.stderr, "nope");
        }
    }
}
