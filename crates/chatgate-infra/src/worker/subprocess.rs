//! Subprocess worker.
//!
//! Runs `program args... <query>` once per call. stdout and stderr are drained
//! concurrently while waiting for exit, so a chatty worker cannot stall on a
//! full pipe. Exit 0 yields the trimmed stdout; any other exit yields the
//! captured stderr. The child is always reaped before `invoke` returns,
//! including when the timeout fires.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tracing::{debug, warn};

use chatgate_core::worker::invoker::Worker;
use chatgate_types::config::WorkerConfig;
use chatgate_types::error::WorkerError;

/// [`Worker`] backed by an external process.
#[derive(Debug, Clone)]
pub struct SubprocessWorker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl SubprocessWorker {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            working_dir: None,
        }
    }

    pub fn from_config(config: &WorkerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            working_dir: config.working_dir.clone(),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, query: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Worker for SubprocessWorker {
    fn name(&self) -> &str {
        &self.program
    }

    async fn invoke(&self, query: &str) -> Result<String, WorkerError> {
        let start = Instant::now();
        let mut child = self.command(query).spawn().map_err(|e| WorkerError::Spawn {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let finished = tokio::time::timeout(self.timeout, async {
            tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
        })
        .await;

        let (status, stdout, stderr) = match finished {
            Ok(Ok(collected)) => collected,
            Ok(Err(e)) => {
                warn!(program = %self.program, error = %e, "Failed reading worker output, killing it");
                // Reap before reporting; the child may still be running.
                kill_worker(&mut child, &self.program).await;
                return Err(WorkerError::Io(e.to_string()));
            }
            Err(_) => {
                warn!(
                    program = %self.program,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Worker timed out, killing it"
                );
                kill_worker(&mut child, &self.program).await;
                return Err(WorkerError::TimedOut {
                    timeout: self.timeout,
                });
            }
        };

        debug!(
            program = %self.program,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "Worker exited"
        );

        if !status.success() {
            return Err(WorkerError::Failed {
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

/// Kill and reap the child. Returns `false` (after logging) if it could not be killed.
async fn kill_worker(child: &mut Child, program: &str) -> bool {
    match child.kill().await {
        Ok(()) => true,
        Err(e) => {
            warn!(program = %program, error = %e, "Failed to kill worker");
            false
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Worker running `sh -c <script> worker <query>`; the query is `$1`.
    fn sh(script: &str) -> SubprocessWorker {
        SubprocessWorker::new(
            "/bin/sh",
            vec!["-c".to_string(), script.to_string(), "worker".to_string()],
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_stdout() {
        let worker = sh(r#"printf '  hello\n\n'"#);
        assert_eq!(worker.invoke("hi").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_query_is_single_final_argument() {
        let worker = sh(r#"printf '%s|%s' "$#" "$1""#);
        assert_eq!(
            worker.invoke("what happened today?").await.unwrap(),
            "1|what happened today?"
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_returns_stderr() {
        let worker = sh("printf 'partial' ; printf 'boom' >&2; exit 1");
        match worker.invoke("hi").await {
            Err(WorkerError::Failed { code, stderr }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stderr_on_success_is_ignored() {
        let worker = sh("echo 'warning: slow model' >&2; echo answer");
        assert_eq!(worker.invoke("q").await.unwrap(), "answer");
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams_does_not_deadlock() {
        let worker = sh(
            "head -c 300000 /dev/zero | tr '\\0' a; head -c 300000 /dev/zero | tr '\\0' b >&2",
        );
        let output = worker.invoke("q").await.unwrap();
        assert_eq!(output.len(), 300_000);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let worker = SubprocessWorker::new(
            "/nonexistent/chatgate-worker",
            Vec::new(),
            Duration::from_secs(1),
        );
        assert!(matches!(
            worker.invoke("hi").await,
            Err(WorkerError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_hung_worker_times_out() {
        let worker = SubprocessWorker::new(
            "/bin/sh",
            vec!["-c".to_string(), "sleep 30".to_string(), "worker".to_string()],
            Duration::from_millis(200),
        );
        let start = Instant::now();
        let result = worker.invoke("hi").await;

        assert!(matches!(result, Err(WorkerError::TimedOut { .. })));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_kill_worker_reaps_running_child() {
        let mut child = tokio::process::Command::new("/bin/sh")
            .args(["-c", "sleep 30"])
            .kill_on_drop(true)
            .spawn()
            .unwrap();

        assert!(kill_worker(&mut child, "/bin/sh").await);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_kill_worker_reports_already_reaped_child() {
        let mut child = tokio::process::Command::new("/bin/sh")
            .args(["-c", "exit 0"])
            .spawn()
            .unwrap();
        child.wait().await.unwrap();

        assert!(!kill_worker(&mut child, "/bin/sh").await);
    }

    #[tokio::test]
    async fn test_working_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let worker = sh("pwd").with_working_dir(dir.path());
        let output = worker.invoke("q").await.unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(&output).canonicalize().unwrap(),
            expected
        );
    }

    #[test]
    fn test_from_config() {
        let config = WorkerConfig {
            program: "/usr/bin/python3".to_string(),
            args: vec!["answer.py".to_string()],
            timeout_secs: 5,
            working_dir: None,
        };
        let worker = SubprocessWorker::from_config(&config);
        assert_eq!(worker.name(), "/usr/bin/python3");
        assert_eq!(worker.timeout, Duration::from_secs(5));
    }
}
