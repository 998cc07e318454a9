use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use crate::errors::ProveError;
use tracing::{debug, warn};

pub const STDERR_PREFIX: &str = "[stderr] ";
pub const TIMEOUT_MARKER: &str = "[TIMEOUT]";

/// Captured result of one external process run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when the process was killed or terminated by a signal.
    pub exit_code: Option<i32>,
    /// stdout and stderr lines in arrival order; stderr lines are prefixed.
    pub lines: Vec<String>,
    pub timed_out: bool,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    pub fn log(&self) -> String {
        self.lines.join("\n")
    }
}

/// Run `program` with a kill-on-deadline timer. Spawn failures are errors;
/// non-zero exits and timeouts are reported through [`ProcessOutput`].
pub async fn run_with_timeout(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<ProcessOutput, ProveError> {
    let started = Instant::now();
    debug!(program, args = ?args, timeout_ms = timeout.as_millis() as u64, "Spawning process");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .env("NO_COLOR", "1")
        .env("FOUNDRY_DISABLE_NIGHTLY_WARNING", "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn()
        .map_err(|e| ProveError::Toolchain(format!("Failed to spawn {}: {}", program, e)))?;

    let stdout = child.stdout.take()
        .ok_or_else(|| ProveError::Internal("child stdout not captured".into()))?;
    let stderr = child.stderr.take()
        .ok_or_else(|| ProveError::Internal("child stderr not captured".into()))?;
    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let mut lines = Vec::new();
    let mut out_done = false;
    let mut err_done = false;
    let mut timed_out = false;

    while !(out_done && err_done) {
        tokio::select! {
            line = out_lines.next_line(), if !out_done => match line {
                Ok(Some(l)) => lines.push(l),
                _ => out_done = true,
            },
            line = err_lines.next_line(), if !err_done => match line {
                Ok(Some(l)) => lines.push(format!("{}{}", STDERR_PREFIX, l)),
                _ => err_done = true,
            },
            _ = &mut deadline => {
                timed_out = true;
                break;
            }
        }
    }

    let exit_code = if timed_out {
        None
    } else {
        tokio::select! {
            status = child.wait() => status
                .map_err(|e| ProveError::Toolchain(format!("Failed to wait for {}: {}", program, e)))?
                .code(),
            _ = &mut deadline => {
                timed_out = true;
                None
            }
        }
    };

    if timed_out {
        if let Err(e) = child.kill().await {
            warn!(program, error = %e, "Failed to kill timed-out process");
        }
        lines.push(format!(
            "{} {} exceeded {} ms and was killed",
            TIMEOUT_MARKER,
            program,
            timeout.as_millis()
        ));
    }

    let duration = started.elapsed();
    debug!(program, exit_code = ?exit_code, timed_out, duration_ms = duration.as_millis() as u64, "Process finished");

    Ok(ProcessOutput { exit_code, lines, timed_out, duration })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_both_streams() {
        let out = run_with_timeout("sh", &sh("echo out; echo err 1>&2; exit 0"), None, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(out.success());
        assert!(out.lines.contains(&"out".to_string()));
        assert!(out.lines.contains(&"[stderr] err".to_string()));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_success() {
        let out = run_with_timeout("sh", &sh("echo boom; exit 3"), None, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.log(), "boom");
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let out = run_with_timeout("sh", &sh("echo started; sleep 10"), None, Duration::from_millis(300))
            .await
            .unwrap();
        assert!(out.timed_out);
        assert!(!out.success());
        assert!(out.log().contains("started"));
        assert!(out.log().contains(TIMEOUT_MARKER));
        assert!(out.duration < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_error() {
        let err = run_with_timeout("/definitely/not/a/binary", &[], None, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProveError::Toolchain(_)));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = run_with_timeout("sh", &sh("pwd"), Some(dir.path()), Duration::from_secs(5))
            .await
            .unwrap();
        let pwd = std::fs::canonicalize(out.lines[0].trim()).unwrap();
        assert_eq!(pwd, std::fs::canonicalize(dir.path()).unwrap());
    }
}
