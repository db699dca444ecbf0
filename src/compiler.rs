//! Process boundary to the compiler under test. The compiler is a black box
//! reached through `<command> <phase-flag> <path-to-temp-source-file>`; its
//! combined stdout+stderr and exit code are the only observable signals.

use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        buf
    })
}

fn join_reader(handle: thread::JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}

/// Combined observable output from one compiler invocation.
#[derive(Debug, Clone)]
pub struct PhaseOutput {
    /// Trimmed stdout, with trimmed stderr appended (newline-joined when
    /// both are non-empty).
    pub output: String,
    /// -1 when the process was killed by a signal.
    pub exit_code: i32,
}

pub trait Compiler: Send + Sync {
    fn run_phase(&self, phase_flag: &str, source: &str) -> Result<PhaseOutput>;
    fn validate(&self) -> Result<()>;
}

/// Invokes an external compiler binary, isolating each run in a transient
/// source file.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    /// May carry leading arguments of its own, e.g. "./student-parser -x".
    pub command: String,
    pub timeout: Option<Duration>,
}

impl ExternalCompiler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    fn command_parts(&self) -> Result<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("compiler command is empty"))?;
        Ok((program, parts.collect()))
    }
}

impl Compiler for ExternalCompiler {
    fn run_phase(&self, phase_flag: &str, source: &str) -> Result<PhaseOutput> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut temp = tempfile::Builder::new()
            .prefix("tinyc-test-")
            .suffix(".tc")
            .tempfile()
            .context("failed to create transient source file")?;
        temp.write_all(source.as_bytes())?;
        temp.flush()?;

        let (program, args) = self.command_parts()?;
        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if !phase_flag.is_empty() {
            cmd.arg(phase_flag);
        }
        cmd.arg(temp.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start '{program}'"))?;

        // Drain both pipes concurrently; output larger than the OS pipe
        // buffer would otherwise block the child before the wait and turn a
        // fast invocation into a spurious timeout.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = match child.wait_timeout(timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(anyhow!("compiler timed out after {} s", timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&join_reader(stdout_reader)).into_owned();
        let stderr = String::from_utf8_lossy(&join_reader(stderr_reader)).into_owned();

        let mut output = stdout.trim().to_string();
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(stderr);
        }

        Ok(PhaseOutput {
            output,
            exit_code: status.code().unwrap_or(-1),
        })
    }

    fn validate(&self) -> Result<()> {
        let (program, _) = self.command_parts()?;
        if program.contains(std::path::MAIN_SEPARATOR) {
            if std::path::Path::new(&program).exists() {
                Ok(())
            } else {
                Err(anyhow!("compiler '{program}' does not exist"))
            }
        } else {
            which::which(&program)
                .map(|_| ())
                .map_err(|_| anyhow!("compiler '{program}' was not found in PATH"))
        }
    }
}
