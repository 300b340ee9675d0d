// src/exec/command.rs

//! Shell-command operations, used by graphs built from a config file.

use std::process::Stdio;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::Task;

/// Build a [`Task`] that runs `cmd` through the platform shell.
///
/// The operation succeeds when the process exits with status 0.
pub fn shell_task(name: impl Into<String>, cmd: impl Into<String>) -> Task {
    let name = name.into();
    let cmd = cmd.into();
    Task::from_async(move || run_command(name.clone(), cmd.clone()))
}

async fn run_command(name: String, cmd: String) -> Result<()> {
    let started = Instant::now();
    info!(task = %name, cmd = %cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&cmd);
        c
    };

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for task '{name}'"))?;

    if let Some(stdout) = child.stdout.take() {
        let task_name = name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(task = %task_name, "stdout: {}", line);
            }
        });
    }

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let task_name = name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{name}'"))?;

    let code = status.code().unwrap_or(-1);
    info!(
        task = %name,
        exit_code = code,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "task process exited"
    );

    if !status.success() {
        bail!("command `{cmd}` exited with code {code}");
    }
    Ok(())
}
