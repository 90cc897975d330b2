//! Blocking execution of backend commands with captured output and an
//! optional time limit.

use ar_types::{AssemblyError, BackendStage};
use itertools::Itertools;
use shell_escape::escape;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Render a command the way it would be typed into a shell.
pub fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|arg| escape(arg.to_string_lossy()))
        .join(" ")
}

/// How stdout and stderr of a command are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Both streams interleaved into `stdout`, as a terminal would show them.
    Combined,
    /// Each stream on its own.
    Separate,
}

/// The result of a command that ran to completion.
#[derive(Debug)]
pub struct CommandOutput {
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Convert an unsuccessful exit into a `BackendExecution` error.
    pub fn check(self, stage: BackendStage) -> Result<Self, AssemblyError> {
        if self.status.success() {
            return Ok(self);
        }
        let output = if self.stderr.is_empty() {
            self.stdout
        } else if self.stdout.is_empty() {
            self.stderr
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        };
        Err(AssemblyError::BackendExecution {
            stage,
            command: self.command,
            exit_code: self.status.code(),
            output,
        })
    }
}

fn capture_file(command: &str) -> Result<File, AssemblyError> {
    tempfile::tempfile()
        .map_err(|e| AssemblyError::io(format!("creating output capture for {command}"), e))
}

fn read_capture(mut file: File, command: &str) -> Result<String, AssemblyError> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut buf))
        .map_err(|e| AssemblyError::io(format!("reading output of {command}"), e))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn clone_handle(file: &File, command: &str) -> Result<Stdio, AssemblyError> {
    file.try_clone()
        .map(Stdio::from)
        .map_err(|e| AssemblyError::io(format!("redirecting output of {command}"), e))
}

fn spawn(cmd: &mut Command, command: &str) -> Result<Child, AssemblyError> {
    cmd.spawn()
        .map_err(|e| AssemblyError::io(format!("failed to run {command}"), e))
}

/// Wait for `child`, killing it if `deadline` passes first.
fn wait_until(
    child: &mut Child,
    command: &str,
    stage: BackendStage,
    deadline: Option<(Instant, Duration)>,
) -> Result<ExitStatus, AssemblyError> {
    let wait_error = |e| AssemblyError::io(format!("waiting for {command}"), e);
    let Some((started, timeout)) = deadline else {
        return child.wait().map_err(wait_error);
    };
    match child
        .wait_timeout(timeout.saturating_sub(started.elapsed()))
        .map_err(wait_error)?
    {
        Some(status) => Ok(status),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(AssemblyError::BackendTimeout {
                stage,
                command: command.to_string(),
                timeout,
            })
        }
    }
}

/// Run `cmd` to completion and collect its output. The exit status is not
/// checked here; see [`CommandOutput::check`].
pub fn run(
    cmd: &mut Command,
    stage: BackendStage,
    capture: Capture,
    timeout: Option<Duration>,
) -> Result<CommandOutput, AssemblyError> {
    let command = command_line(cmd);
    let out_file = capture_file(&command)?;
    let err_file = match capture {
        Capture::Combined => None,
        Capture::Separate => Some(capture_file(&command)?),
    };

    cmd.stdin(Stdio::null())
        .stdout(clone_handle(&out_file, &command)?)
        .stderr(clone_handle(err_file.as_ref().unwrap_or(&out_file), &command)?);

    let started = Instant::now();
    let mut child = spawn(cmd, &command)?;
    let status = wait_until(
        &mut child,
        &command,
        stage,
        timeout.map(|t| (started, t)),
    )?;

    let stdout = read_capture(out_file, &command)?;
    let stderr = match err_file {
        Some(f) => read_capture(f, &command)?,
        None => String::new(),
    };
    Ok(CommandOutput {
        command,
        status,
        stdout,
        stderr,
    })
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn failed(
    stage: BackendStage,
    command: String,
    status: ExitStatus,
    err_file: File,
) -> Result<(), AssemblyError> {
    Err(AssemblyError::BackendExecution {
        stage,
        output: read_capture(err_file, &command)?,
        command,
        exit_code: status.code(),
    })
}

/// Run `producer | consumer > out_path`.
///
/// Both commands must succeed; a failing producer is reported even if the
/// consumer exits cleanly. If the consumer fails, the producer is stopped and
/// the consumer's exit is reported. The timeout covers the whole pipeline.
///
/// The commands are consumed: the parent must not keep the read end of the
/// pipe open once the consumer is running.
pub fn run_pipeline(
    mut producer: Command,
    mut consumer: Command,
    out_path: &Path,
    stage: BackendStage,
    timeout: Option<Duration>,
) -> Result<(), AssemblyError> {
    let producer_line = command_line(&producer);
    let consumer_line = command_line(&consumer);
    let pipeline = format!("{producer_line} | {consumer_line}");

    let out = File::create(out_path).map_err(|e| {
        AssemblyError::io(format!("creating {}", out_path.display()), e)
    })?;
    let producer_err = capture_file(&producer_line)?;
    let consumer_err = capture_file(&consumer_line)?;

    let started = Instant::now();
    let deadline = timeout.map(|t| (started, t));

    let mut producer_child = spawn(
        producer
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(clone_handle(&producer_err, &producer_line)?),
        &producer_line,
    )?;
    drop(producer);
    let Some(pipe) = producer_child.stdout.take() else {
        stop(&mut producer_child);
        return Err(AssemblyError::io(
            format!("connecting {pipeline}"),
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout was not captured"),
        ));
    };

    let consumer_child = consumer
        .stdin(Stdio::from(pipe))
        .stdout(Stdio::from(out))
        .stderr(clone_handle(&consumer_err, &consumer_line)?)
        .spawn();
    // releases the parent's copy of the pipe's read end
    drop(consumer);
    let mut consumer_child = match consumer_child {
        Ok(child) => child,
        Err(e) => {
            stop(&mut producer_child);
            return Err(AssemblyError::io(format!("failed to run {consumer_line}"), e));
        }
    };

    let consumer_status = match wait_until(&mut consumer_child, &pipeline, stage, deadline) {
        Ok(status) => status,
        Err(e) => {
            stop(&mut producer_child);
            return Err(e);
        }
    };
    if !consumer_status.success() {
        stop(&mut producer_child);
        return failed(stage, consumer_line, consumer_status, consumer_err);
    }
    let producer_status = wait_until(&mut producer_child, &pipeline, stage, deadline)?;
    if !producer_status.success() {
        return failed(stage, producer_line, producer_status, producer_err);
    }
    Ok(())
}
