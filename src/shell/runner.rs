//! Runs one command in a subordinate shell and recovers its working directory.
//!
//! The command is wrapped as `<command> && pwd` and handed to `sh -c`, so on
//! success the last line of stdout is always the directory the shell ended in.
//! stdout and stderr are captured separately and never merged.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::event::AppEvent;

use super::{ExecutionHandle, ExecutionId, Outcome, RunError};

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = "sh";

/// Appended to every command so a successful run reports its final directory.
const PWD_SUFFIX: &str = " && pwd";

/// Builds the script passed to `sh -c`.
pub fn wrap_command(command: &str) -> String {
    format!("{command}{PWD_SUFFIX}")
}

/// Captured result of a shell that exited on its own.
struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    /// No limit when `None`; the command runs until it exits or is cancelled.
    timeout: Option<Duration>,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.shell.clone()).with_timeout(config.command_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Starts `command` on a worker task and returns its handle immediately.
    ///
    /// The worker never touches session state. When the shell finishes (or is
    /// cancelled) it posts [`AppEvent::ExecutionFinished`] to `event_sink`, and
    /// the control loop applies the outcome.
    pub fn spawn(
        &self,
        id: ExecutionId,
        command: String,
        cwd: PathBuf,
        event_sink: UnboundedSender<AppEvent>,
    ) -> ExecutionHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let runner = self.clone();
        let worker_command = command.clone();

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let outcome = runner.run(&worker_command, &cwd, &token).await;
            let elapsed = started.elapsed();
            debug!(id, outcome = outcome.kind(), ?elapsed, "Execution finished");

            if event_sink
                .send(AppEvent::ExecutionFinished { id, outcome, elapsed })
                .is_err()
            {
                // Control loop is gone (session quit); nothing left to update.
                debug!(id, "Dropping outcome, event receiver closed");
            }
        });

        ExecutionHandle::new(id, command, cancel, task)
    }

    /// Runs `command` in `cwd` until it exits or `cancel` fires.
    ///
    /// Never fails: spawn and wait errors become [`Outcome::Failed`].
    pub async fn run(&self, command: &str, cwd: &Path, cancel: &CancellationToken) -> Outcome {
        match self.try_run(command, cwd, cancel).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Command `{}` failed to run: {}", command, e);
                Outcome::Failed {
                    exit_code: None,
                    error_text: e.to_string(),
                }
            }
        }
    }

    async fn try_run(
        &self,
        command: &str,
        cwd: &Path,
        cancel: &CancellationToken,
    ) -> Result<Outcome, RunError> {
        let script = wrap_command(command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(&script)
            .current_dir(cwd)
            .env("PWD", cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so cancellation also reaches whatever sh forked.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
            shell: self.shell.clone(),
            cwd: cwd.to_path_buf(),
            source,
        })?;
        let pid = child.id();
        info!(pid, cwd = %cwd.display(), "Spawned `{}`", script);

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let readers = [stdout.abort_handle(), stderr.abort_handle()];

        let finished = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            captured = wait_and_drain(&mut child, stdout, stderr, self.timeout) => Some(captured),
        };

        match finished {
            Some(Ok(captured)) => Ok(Outcome::from_exit(
                captured.status.code(),
                &captured.stdout,
                &captured.stderr,
            )),
            Some(Err(e)) => {
                terminate(&mut child, pid).await;
                readers.iter().for_each(|r| r.abort());
                Err(e)
            }
            None => {
                debug!(pid, "Cancellation requested, killing shell");
                terminate(&mut child, pid).await;
                readers.iter().for_each(|r| r.abort());
                Ok(Outcome::Cancelled)
            }
        }
    }
}

/// Reads a stream to EOF on its own task so a chatty command cannot fill the
/// pipe and block while we wait for it.
fn drain<R>(stream: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            if let Err(e) = stream.read_to_end(&mut buf).await {
                debug!("Stopped reading shell output early: {}", e);
            }
        }
        buf
    })
}

/// The single suspension point: process exit plus both streams reaching EOF.
async fn wait_and_drain(
    child: &mut Child,
    stdout: JoinHandle<Vec<u8>>,
    stderr: JoinHandle<Vec<u8>>,
    limit: Option<Duration>,
) -> Result<Captured, RunError> {
    let work = async {
        let status = child.wait().await.map_err(RunError::Wait)?;
        let stdout = stdout.await.unwrap_or_default();
        let stderr = stderr.await.unwrap_or_default();
        Ok::<_, RunError>(Captured {
            status,
            stdout,
            stderr,
        })
    };

    match limit {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .map_err(|_| RunError::TimedOut(limit))?,
        None => work.await,
    }
}

/// Kills the shell (and its process group on Unix) and reaps it.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        kill_process_group(pid);
    }
    if let Err(e) = child.start_kill() {
        // Already exited; still needs reaping below.
        debug!("start_kill: {}", e);
    }
    if let Err(e) = child.wait().await {
        warn!("Failed to reap killed shell: {}", e);
    }
}

#[cfg(unix)]
fn kill_process_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: killpg only delivers a signal; the group was created at spawn.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        debug!(pgid, "killpg failed: {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}
