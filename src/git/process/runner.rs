use std::borrow::Cow;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::git::errors::ProcessError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Raw result of one engine invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// The human-readable failure text: stderr, or stdout when stderr is empty
    /// (`git commit` reports on stdout).
    pub fn message(&self) -> String {
        let stderr = self.stderr_lossy();
        let stderr = stderr.trim();
        if stderr.is_empty() {
            self.stdout_lossy().trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Executes engine commands.
///
/// Implementations must not retry and must report the exit code faithfully;
/// a non-zero exit is an `Ok` result, only failing to drive the process at
/// all is an `Err`.
pub trait ProcessRunner {
    fn run(&self, args: &[OsString], cwd: &Path) -> Result<ProcessOutput, ProcessError>;
}

/// How the git executable is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub program: PathBuf,
    /// Kill the engine after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Extra environment applied after the fixed locale/prompt settings
    pub env: Vec<(OsString, OsString)>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: None,
            env: Vec::new(),
        }
    }
}

/// Runs the real `git` executable
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    config: RunnerConfig,
}

impl GitCli {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn command(&self, args: &[OsString], cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(args)
            .current_dir(cwd)
            // Stable English messages for the error translator, and never
            // block on a credential prompt.
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.config.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn render(&self, args: &[OsString]) -> String {
        let mut rendered = self.config.program.to_string_lossy().into_owned();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }

    fn spawn_error(&self, source: std::io::Error) -> ProcessError {
        ProcessError::Spawn {
            program: self.config.program.to_string_lossy().into_owned(),
            source,
        }
    }

    fn wait_with_timeout(
        &self,
        mut child: Child,
        timeout: Duration,
        args: &[OsString],
    ) -> Result<ProcessOutput, ProcessError> {
        // Drain both pipes concurrently so a chatty engine cannot fill a pipe
        // buffer and stall while we poll for exit.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= timeout {
                let command = self.render(args);
                tracing::warn!(command = %command, ?timeout, "killing git after timeout");
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProcessError::TimedOut { command, timeout });
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(ProcessOutput {
            stdout: collect(stdout)?,
            stderr: collect(stderr)?,
            code: status.code(),
        })
    }
}

impl ProcessRunner for GitCli {
    fn run(&self, args: &[OsString], cwd: &Path) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = self.command(args, cwd);

        match self.config.timeout {
            None => {
                let output = cmd.output().map_err(|e| self.spawn_error(e))?;
                Ok(ProcessOutput {
                    stdout: output.stdout,
                    stderr: output.stderr,
                    code: output.status.code(),
                })
            }
            Some(timeout) => {
                let child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
                self.wait_with_timeout(child, timeout, args)
            }
        }
    }
}

type Reader = thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<Reader>) -> Result<Vec<u8>, ProcessError> {
    match reader {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| std::io::Error::other("pipe reader thread panicked"))??;
            Ok(bytes)
        }
        None => Ok(Vec::new()),
    }
}
